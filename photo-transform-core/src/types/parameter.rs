//! Flattened template parameters and their per-kind encoding rules.

use std::fmt;

use crate::utils::lenient::format_number;

/// Encoding kind of one flattened parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    List,
    Int,
    Float,
    Color,
    /// A radio branch whose value is itself the payload.
    RadioValue,
    /// A radio group selector.
    Radio,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Int => "int",
            Self::Float => "float",
            Self::Color => "color",
            Self::RadioValue => "radio_value",
            Self::Radio => "radio",
        }
    }

    /// Capture group substituted for the placeholder when decoding.
    pub fn value_pattern(self) -> &'static str {
        match self {
            Self::List | Self::RadioValue | Self::Radio => "(.*)",
            Self::Int => r"(\d+)",
            Self::Float => r"(-?\d+\.?\d*)",
            Self::Color => "(#?[0-9a-fA-F]+)",
        }
    }

    /// Radio kinds select a branch instead of assigning a value.
    pub fn selects_branch(self) -> bool {
        matches!(self, Self::Radio | Self::RadioValue)
    }

    /// Whether a stored token for this kind may carry several `,`/`;` separated values.
    pub fn splits_multi_value(self) -> bool {
        !matches!(self, Self::List)
    }

    /// Control value -> stored text. `None` drops the fragment.
    pub fn encode_value(self, raw: &str) -> Option<String> {
        match self {
            Self::Float => {
                let percent: f64 = raw.trim().parse().ok()?;
                let mut text = (percent / 100.0).to_string();
                if !text.contains('.') {
                    text.push_str(".0");
                }
                Some(text)
            }
            Self::Color => Some(raw.strip_prefix('#').unwrap_or(raw).to_string()),
            _ => Some(raw.to_string()),
        }
    }

    /// Stored text -> control value. `None` leaves the control untouched.
    pub fn decode_value(self, stored: &str) -> Option<String> {
        match self {
            Self::Float => {
                let fraction: f64 = stored.parse().ok()?;
                Some(format_number(fraction * 100.0))
            }
            Self::Color if !stored.starts_with('#') => Some(format!("#{stored}")),
            _ => Some(stored.to_string()),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter hangs in the detail tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamParent {
    #[default]
    Root,
    Radio,
    Details,
}

/// 模板参数（由 command 的 detail 树按深度优先展开）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub kind: ParamKind,
    /// Format with placeholder; empty for a radio group without one.
    pub format: String,
    pub level: usize,
    pub parent: ParamParent,
    /// Dotted schema path of the node (`$`, `$.d0`, `$.d0.r1`, ...).
    pub key: String,
}

impl Parameter {
    /// Format with one leading `:`, `,` or `;` removed (decode side).
    pub fn bare_format(&self) -> &str {
        self.format
            .strip_prefix([':', ',', ';'])
            .unwrap_or(&self.format)
    }
}
