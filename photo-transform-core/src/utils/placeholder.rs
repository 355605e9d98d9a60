//! `<placeholder>` handling inside detail format strings.
//!
//! A format such as `":w_<width>"` carries exactly one placeholder token. The
//! token spans from the first `<` to the last `>`.

use regex::{Regex, RegexBuilder};

/// Splits a format into the literal text before and after its placeholder.
pub fn split(format: &str) -> Option<(&str, &str)> {
    let start = format.find('<')?;
    let end = format.rfind('>')?;
    if end < start {
        return None;
    }
    Some((&format[..start], &format[end + 1..]))
}

/// Whether `text` contains a `<placeholder>` token.
pub fn has_placeholder(text: &str) -> bool {
    split(text).is_some()
}

/// Replaces the placeholder with `value`. Formats without a placeholder are returned unchanged.
pub fn fill(format: &str, value: &str) -> String {
    match split(format) {
        Some((head, tail)) => format!("{head}{value}{tail}"),
        None => format.to_string(),
    }
}

/// Builds an anchored, case-insensitive matcher with `capture` in place of the placeholder.
///
/// Literal parts of the format are escaped. Returns `None` when the resulting
/// pattern does not compile.
pub fn matcher(format: &str, capture: &str) -> Option<Regex> {
    let body = match split(format) {
        Some((head, tail)) => format!(
            "{}{capture}{}",
            regex::escape(head),
            regex::escape(tail)
        ),
        None => regex::escape(format),
    };
    RegexBuilder::new(&format!("^{body}$"))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Matches `text` against `format` and returns the last capture group.
pub fn extract(format: &str, capture: &str, text: &str) -> Option<String> {
    let re = matcher(format, capture)?;
    let caps = re.captures(text)?;
    caps.iter()
        .flatten()
        .last()
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        assert_eq!(split(":w_<width>"), Some((":w_", "")));
        assert_eq!(split("e_<a>_<b>x"), Some(("e_", "x")));
        assert_eq!(split("fill"), None);
        assert_eq!(split("a>b<"), None);
    }

    #[test]
    fn test_fill() {
        assert_eq!(fill(":w_<width>", "800"), ":w_800");
        assert_eq!(fill("<x>,", "5"), "5,");
        assert_eq!(fill("auto", "5"), "auto");
    }

    #[test]
    fn test_extract_escapes_literals() {
        assert_eq!(extract("w.<n>", r"(\d+)", "w.80").as_deref(), Some("80"));
        assert_eq!(extract("w.<n>", r"(\d+)", "wx80"), None);
        assert_eq!(extract("W_<n>", r"(\d+)", "w_80").as_deref(), Some("80"));
    }

    #[test]
    fn test_extract_without_placeholder_matches_whole_text() {
        assert_eq!(extract("auto", "(.*)", "auto").as_deref(), Some("auto"));
        assert_eq!(extract("auto", "(.*)", "best"), None);
    }
}
