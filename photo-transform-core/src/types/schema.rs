//! 变换配置 schema 类型定义
//!
//! `transformation.json` 结构：`{"qualifiers": {<name>: Qualifier, ...}}`，
//! 每个 qualifier 拥有若干 command，command 本身就是一棵 detail 树的根节点。

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::utils::lenient;

/// 完整的变换 schema（按声明顺序保存 qualifier）
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct TransformSchema {
    qualifiers: IndexMap<String, Qualifier>,
}

#[derive(Deserialize)]
struct RawSchema {
    #[serde(default)]
    qualifiers: IndexMap<String, Qualifier>,
}

impl TryFrom<RawSchema> for TransformSchema {
    type Error = CoreError;

    fn try_from(raw: RawSchema) -> CoreResult<Self> {
        Self::new(raw.qualifiers)
    }
}

impl TransformSchema {
    /// Builds a schema, resolving default prefixes and rejecting duplicates.
    pub fn new(mut qualifiers: IndexMap<String, Qualifier>) -> CoreResult<Self> {
        let mut seen: IndexMap<String, String> = IndexMap::new();
        for (name, qualifier) in &mut qualifiers {
            if qualifier.prefix.is_empty() {
                qualifier.prefix = name.chars().next().map(String::from).ok_or_else(|| {
                    CoreError::InvalidSchema("qualifier with empty name".to_string())
                })?;
            }
            if let Some(other) = seen.insert(qualifier.prefix.clone(), name.clone()) {
                return Err(CoreError::InvalidSchema(format!(
                    "prefix '{}' shared by '{other}' and '{name}'",
                    qualifier.prefix
                )));
            }
        }
        Ok(Self { qualifiers })
    }

    /// 从 JSON 文本解析
    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        serde_json::from_str(text).map_err(|e| {
            // try_from 的错误也会经由 serde_json 包装
            let message = e.to_string();
            if message.starts_with("Invalid schema") {
                CoreError::InvalidSchema(message)
            } else {
                CoreError::SerializationError(message)
            }
        })
    }

    pub fn qualifiers(&self) -> &IndexMap<String, Qualifier> {
        &self.qualifiers
    }

    pub fn qualifier(&self, name: &str) -> CoreResult<&Qualifier> {
        self.qualifiers
            .get(name)
            .ok_or_else(|| CoreError::QualifierNotFound(name.to_string()))
    }

    /// Qualifier names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.qualifiers.keys().map(String::as_str)
    }
}

/// Qualifier 的选择方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualifierType {
    /// 下拉列表（默认）
    #[default]
    List,
    /// 单选按钮组
    Radio,
    #[serde(other)]
    Unknown,
}

impl QualifierType {
    pub fn is_radio(self) -> bool {
        matches!(self, Self::Radio)
    }
}

/// Radio group layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Vertical,
    #[default]
    #[serde(other)]
    Horizontal,
}

impl Direction {
    /// CSS `display` value for the group.
    pub fn display(self) -> &'static str {
        match self {
            Self::Vertical => "block",
            Self::Horizontal => "flex",
        }
    }
}

/// 可开关的功能组（crop / gravity / effect ...）
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Qualifier {
    /// Short id prefix; resolved to the first character of the name when absent.
    #[serde(default)]
    pub prefix: String,
    #[serde(default, rename = "type")]
    pub kind: QualifierType,
    #[serde(default)]
    pub commands: Vec<Command>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub direction: Direction,
}

impl Qualifier {
    /// Command whose `command` name equals `name`.
    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|c| c.command.as_deref() == Some(name))
    }

    /// Radio branch whose `value` token equals `value`.
    pub fn find_branch(&self, value: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|c| c.value.as_deref() == Some(value))
    }
}

/// A command is the root detail of its own tree.
pub type Command = Detail;

/// 参数描述节点（叶子或复合）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawDetail")]
pub struct Detail {
    pub command: Option<String>,
    /// Radio branch identifying token.
    pub value: Option<String>,
    /// Format string with a single `<placeholder>`.
    pub detail: Option<String>,
    pub description: Option<String>,
    pub kind: Option<DetailKind>,
    /// The branch value itself is the payload.
    pub radio_value: bool,
    pub required: bool,
    pub depends: Option<Depends>,
    pub details: Vec<Detail>,
    pub direction: Direction,
}

impl Detail {
    /// `detail`, falling back to `value`.
    pub fn format(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .or(self.value.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Token a radio branch reports as the active value: its command, else its value.
    pub fn branch_token(&self) -> &str {
        self.command
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.value.as_deref())
            .unwrap_or_default()
    }

    pub fn radio_branches(&self) -> Option<&[Detail]> {
        match &self.kind {
            Some(DetailKind::Radio(branches)) => Some(branches),
            _ => None,
        }
    }
}

/// 控件类型（互斥）
#[derive(Debug, Clone, PartialEq)]
pub enum DetailKind {
    List(Vec<ListValue>),
    RangeInt(NumericRange),
    RangeFloat(NumericRange),
    RangeColor(ColorRange),
    Radio(Vec<Detail>),
}

impl DetailKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list_value",
            Self::RangeInt(_) => "range_int",
            Self::RangeFloat(_) => "range_float",
            Self::RangeColor(_) => "range_color",
            Self::Radio(_) => "radio",
        }
    }
}

/// One option of a list control.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawListValue")]
pub struct ListValue {
    pub value: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawListValue {
    Object { value: String },
    Plain(String),
}

impl From<RawListValue> for ListValue {
    fn from(raw: RawListValue) -> Self {
        match raw {
            RawListValue::Object { value } | RawListValue::Plain(value) => Self { value },
        }
    }
}

/// Bounds and default of a numeric control.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NumericRange {
    #[serde(default, deserialize_with = "lenient::option_number")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_number")]
    pub max: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_number")]
    pub default: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ColorRange {
    #[serde(default)]
    pub default: Option<String>,
}

/// 显示依赖：仅当 `qualifier` 选中且当前命令为 `command` 时显示
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Depends {
    pub qualifier: String,
    pub command: String,
}

#[derive(Deserialize)]
struct RawDetail {
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    list_value: Option<Vec<ListValue>>,
    #[serde(default)]
    range_int: Option<NumericRange>,
    #[serde(default)]
    range_float: Option<NumericRange>,
    #[serde(default)]
    range_color: Option<ColorRange>,
    #[serde(default)]
    radio: Option<Vec<Detail>>,
    #[serde(default, deserialize_with = "lenient::flag")]
    radio_value: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    required: bool,
    #[serde(default)]
    depends: Option<Depends>,
    #[serde(default)]
    details: Option<Vec<Detail>>,
    #[serde(default)]
    direction: Direction,
}

impl TryFrom<RawDetail> for Detail {
    type Error = CoreError;

    fn try_from(raw: RawDetail) -> CoreResult<Self> {
        let mut kinds: Vec<DetailKind> = Vec::new();
        if let Some(values) = raw.list_value {
            kinds.push(DetailKind::List(values));
        }
        if let Some(range) = raw.range_int {
            kinds.push(DetailKind::RangeInt(range));
        }
        if let Some(range) = raw.range_float {
            kinds.push(DetailKind::RangeFloat(range));
        }
        if let Some(range) = raw.range_color {
            kinds.push(DetailKind::RangeColor(range));
        }
        if let Some(branches) = raw.radio {
            kinds.push(DetailKind::Radio(branches));
        }
        if kinds.len() > 1 {
            let names: Vec<&str> = kinds.iter().map(DetailKind::name).collect();
            return Err(CoreError::InvalidSchema(format!(
                "detail '{}' declares several kinds: {}",
                raw.detail.or(raw.command).unwrap_or_default(),
                names.join(", ")
            )));
        }

        Ok(Self {
            command: raw.command,
            value: raw.value,
            detail: raw.detail,
            description: raw.description.filter(|d| !d.is_empty()),
            kind: kinds.pop(),
            radio_value: raw.radio_value,
            required: raw.required,
            depends: raw.depends,
            details: raw.details.unwrap_or_default(),
            direction: raw.direction,
        })
    }
}
