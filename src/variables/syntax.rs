//! Variable reference syntax.
//!
//! # Responsibilities
//! - Recognise whole-string references (`is_variable`)
//! - Detect embedded references (`uses_variables`)
//! - Rewrite every reference through a lookup function (`substitute`)

pub const UNIX_OPEN: &str = "${";
pub const UNIX_CLOSE: &str = "}";
pub const WINDOWS_OPEN: &str = "%%";
pub const WINDOWS_CLOSE: &str = "%%";
pub const HEX_OPEN: &str = "$[";
pub const HEX_CLOSE: &str = "]";

/// The form a reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Unix,
    Windows,
    Hex,
}

/// A single reference located inside a larger string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    pub kind: ReferenceKind,
    /// Byte offset of the opening token.
    pub start: usize,
    /// Byte offset one past the closing token.
    pub end: usize,
    /// Text between the tokens.
    pub name: &'a str,
}

/// Returns true if the whole string is a single variable reference.
pub fn is_variable(text: &str) -> bool {
    let text = text.trim();
    (text.starts_with(UNIX_OPEN) && text.ends_with(UNIX_CLOSE))
        || (text.len() >= 2 * WINDOWS_OPEN.len()
            && text.starts_with(WINDOWS_OPEN)
            && text.ends_with(WINDOWS_CLOSE))
        || (text.starts_with(HEX_OPEN) && text.ends_with(HEX_CLOSE))
}

/// Strips the reference tokens from a whole-string reference.
///
/// Strings that are not a reference are returned unchanged.
pub fn variable_name(text: &str) -> &str {
    let trimmed = text.trim();
    if !is_variable(trimmed) {
        return text;
    }
    let (open, close) = if trimmed.starts_with(UNIX_OPEN) {
        (UNIX_OPEN, UNIX_CLOSE)
    } else if trimmed.starts_with(WINDOWS_OPEN) {
        (WINDOWS_OPEN, WINDOWS_CLOSE)
    } else {
        (HEX_OPEN, HEX_CLOSE)
    };
    &trimmed[open.len()..trimmed.len() - close.len()]
}

/// Returns true if the string contains at least one reference anywhere.
pub fn uses_variables(text: &str) -> bool {
    next_reference(text, 0).is_some()
}

/// Finds the first complete reference at or after `from`.
pub fn next_reference(text: &str, from: usize) -> Option<Reference<'_>> {
    let mut cursor = from;
    while cursor < text.len() {
        let rest = &text[cursor..];
        let offset = rest.find(['$', '%'])?;
        let start = cursor + offset;
        let tail = &text[start..];

        let candidate = if tail.starts_with(UNIX_OPEN) {
            enclosed(text, start, UNIX_OPEN, UNIX_CLOSE, ReferenceKind::Unix)
        } else if tail.starts_with(HEX_OPEN) {
            enclosed(text, start, HEX_OPEN, HEX_CLOSE, ReferenceKind::Hex)
        } else if tail.starts_with(WINDOWS_OPEN) {
            enclosed(text, start, WINDOWS_OPEN, WINDOWS_CLOSE, ReferenceKind::Windows)
        } else {
            None
        };

        match candidate {
            Some(reference) => return Some(reference),
            None => cursor = start + 1,
        }
    }
    None
}

fn enclosed<'a>(
    text: &'a str,
    start: usize,
    open: &str,
    close: &str,
    kind: ReferenceKind,
) -> Option<Reference<'a>> {
    let body_start = start + open.len();
    let body_len = text[body_start..].find(close)?;
    let name = &text[body_start..body_start + body_len];
    if name.is_empty() {
        return None;
    }
    Some(Reference {
        kind,
        start,
        end: body_start + body_len + close.len(),
        name,
    })
}

/// Replaces every reference through `lookup`.
///
/// Named references the lookup cannot satisfy are kept verbatim. Hex
/// references (`$[41,42]`) are decoded to the characters they name and never
/// consult the lookup.
pub fn substitute<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some(reference) = next_reference(text, cursor) {
        out.push_str(&text[cursor..reference.start]);
        let replacement = match reference.kind {
            ReferenceKind::Unix | ReferenceKind::Windows => lookup(reference.name),
            ReferenceKind::Hex => decode_hex_chars(reference.name),
        };
        match replacement {
            Some(value) => out.push_str(&value),
            None => out.push_str(&text[reference.start..reference.end]),
        }
        cursor = reference.end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn decode_hex_chars(body: &str) -> Option<String> {
    body.split(',')
        .map(|code| {
            u32::from_str_radix(code.trim(), 16)
                .ok()
                .and_then(char::from_u32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "HOST" => Some("nn1".to_string()),
            "DAY" => Some("2024-01-01".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_is_variable() {
        assert!(is_variable("${HOST}"));
        assert!(is_variable("%%HOST%%"));
        assert!(is_variable("$[41]"));
        assert!(!is_variable("nn1"));
        assert!(!is_variable("/data/${DAY}/x"));
        assert!(!is_variable("%%"));
    }

    #[test]
    fn test_variable_name() {
        assert_eq!(variable_name("${HOST}"), "HOST");
        assert_eq!(variable_name("%%HOST%%"), "HOST");
        assert_eq!(variable_name("plain"), "plain");
    }

    #[test]
    fn test_uses_variables() {
        assert!(uses_variables("/data/${DAY}/x"));
        assert!(uses_variables("pre%%DAY%%post"));
        assert!(!uses_variables("/data/$/x"));
        assert!(!uses_variables("100%"));
        assert!(!uses_variables("${}"));
    }

    #[test]
    fn test_substitute_mixed() {
        assert_eq!(
            substitute("hdfs://${HOST}/logs/%%DAY%%", lookup),
            "hdfs://nn1/logs/2024-01-01"
        );
    }

    #[test]
    fn test_substitute_keeps_unknown() {
        assert_eq!(substitute("/a/${NOPE}/b", lookup), "/a/${NOPE}/b");
    }

    #[test]
    fn test_substitute_hex() {
        assert_eq!(substitute("x$[41,42]y", lookup), "xABy");
        assert_eq!(substitute("$[zz]", lookup), "$[zz]");
    }

    #[test]
    fn test_unterminated_reference_is_literal() {
        assert_eq!(substitute("/a/${HOST", lookup), "/a/${HOST");
    }
}
