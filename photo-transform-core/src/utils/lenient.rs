//! Lenient serde helpers for hand-written schema files.
//!
//! Schema authors mix JSON numbers and numeric strings (`"min": "0.1"`), and
//! write flags either as booleans or as the string `"true"`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

/// Deserializes `Option<f64>` from a number, a numeric string, `""` or `null`.
pub fn option_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>()
                .map(Some)
                .map_err(|e| Error::custom(format!("Invalid number '{s}': {e}")))
        }
        None => Ok(None),
    }
}

/// Deserializes a flag from `true`/`false`, `"true"`/anything else, a number or `null`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Number(f64),
        String(String),
    }

    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Number(n)) => n != 0.0,
        Some(RawFlag::String(s)) => s.eq_ignore_ascii_case("true"),
        None => false,
    })
}

/// Formats a number the way a form input shows it: integral values without a fraction.
pub fn format_number(n: f64) -> String {
    let rounded = n.round();
    if (n - rounded).abs() < 1e-9 {
        format!("{rounded:.0}")
    } else {
        let text = format!("{n:.6}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "option_number")]
        min: Option<f64>,
        #[serde(default, deserialize_with = "flag")]
        required: bool,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(probe(r#"{"min": 5}"#).min, Some(5.0));
        assert_eq!(probe(r#"{"min": "0.25"}"#).min, Some(0.25));
        assert_eq!(probe(r#"{"min": ""}"#).min, None);
        assert_eq!(probe(r#"{"min": null}"#).min, None);
        assert_eq!(probe("{}").min, None);
        assert!(serde_json::from_str::<Probe>(r#"{"min": "abc"}"#).is_err());
    }

    #[test]
    fn test_flag_forms() {
        assert!(probe(r#"{"required": "true"}"#).required);
        assert!(probe(r#"{"required": true}"#).required);
        assert!(probe(r#"{"required": 1}"#).required);
        assert!(!probe(r#"{"required": "false"}"#).required);
        assert!(!probe(r#"{"required": "yes"}"#).required);
        assert!(!probe("{}").required);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(0.5 * 100.0), "50");
        assert_eq!(format_number(55.5), "55.5");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(0.555 * 100.0), "55.5");
    }
}
