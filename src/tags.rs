//! Go struct tag parsing.
//!
//! Struct tags follow the `reflect.StructTag` convention: a sequence of
//! space-separated `key:"value"` pairs where the value is a double-quoted
//! string. Within a value, the first comma-separated element is the name
//! and the remaining elements are options, as in `json:"addr,omitempty"`.

use thiserror::Error;

/// Errors from a malformed struct tag.
///
/// Callers that extract directives treat any of these as "no directive"
/// and skip the field without reporting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("bad syntax for struct tag pair")]
    Syntax,
    #[error("bad syntax for struct tag key")]
    Key,
    #[error("bad syntax for struct tag value")]
    Value,
}

/// One `key:"name,opt1,opt2"` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// The part before the colon.
    pub key: String,
    /// First comma-separated element of the value.
    pub name: String,
    /// Remaining comma-separated elements.
    pub options: Vec<String>,
}

/// All pairs parsed from one struct tag.
#[derive(Debug, Clone, Default)]
pub struct Tags(Vec<Tag>);

impl Tags {
    /// Parse the contents of a struct tag (already stripped of its
    /// surrounding quotes or backticks).
    pub fn parse(input: &str) -> Result<Tags, TagError> {
        let mut tags = Vec::new();
        let mut s = input.as_bytes();

        loop {
            // Leading spaces separate pairs.
            let skip = s.iter().take_while(|&&c| c == b' ').count();
            s = &s[skip..];
            if s.is_empty() {
                break;
            }

            // Key runs up to the colon introducing the quoted value.
            let mut i = 0;
            while i < s.len() && s[i] > b' ' && s[i] != b':' && s[i] != b'"' && s[i] != 0x7f {
                i += 1;
            }
            if i == 0 {
                return Err(TagError::Key);
            }
            if i + 1 >= s.len() || s[i] != b':' {
                return Err(TagError::Syntax);
            }
            if s[i + 1] != b'"' {
                return Err(TagError::Value);
            }
            let key = std::str::from_utf8(&s[..i])
                .map_err(|_| TagError::Key)?
                .to_string();
            s = &s[i + 1..];

            // Quoted value with backslash escapes.
            let mut i = 1;
            while i < s.len() && s[i] != b'"' {
                if s[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= s.len() {
                return Err(TagError::Value);
            }
            let quoted = std::str::from_utf8(&s[..=i]).map_err(|_| TagError::Value)?;
            s = &s[i + 1..];

            let value = unquote_interpreted(quoted).ok_or(TagError::Value)?;

            let mut parts = value.split(',').map(str::to_string);
            let name = parts.next().unwrap_or_default();
            let options: Vec<String> = parts.collect();

            tags.push(Tag { key, name, options });
        }

        Ok(Tags(tags))
    }

    /// Look up a pair by key.
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.0.iter().find(|t| t.key == key)
    }

    /// Iterate over all pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

/// Minimal `strconv.Unquote`: accepts a backtick raw string or a
/// double-quoted string with the common escapes. Returns None for
/// anything else.
pub fn unquote_literal(lit: &str) -> Option<String> {
    if let Some(rest) = lit.strip_prefix('`') {
        let inner = rest.strip_suffix('`')?;
        if inner.contains('`') {
            return None;
        }
        return Some(inner.to_string());
    }
    unquote_interpreted(lit)
}

/// Unquote a double-quoted string, processing backslash escapes.
fn unquote_interpreted(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '"' {
            return None;
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            _ => return None,
        }
    }
    Some(out)
}
