//! 控件节点定义

use std::fmt;

/// Handle of a node inside a [`super::Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Checkbox,
    Radio,
    Number,
    Color,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Number => "number",
            Self::Color => "color",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Div,
    Ul,
    Li,
    P,
    Label,
    Select,
    Option,
    Input(InputType),
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Ul => "ul",
            Self::Li => "li",
            Self::P => "p",
            Self::Label => "label",
            Self::Select => "select",
            Self::Option => "option",
            Self::Input(_) => "input",
        }
    }

    /// `input` and `select` carry a value.
    pub fn is_control(self) -> bool {
        matches!(self, Self::Input(_) | Self::Select)
    }

    pub fn is_radio(self) -> bool {
        matches!(self, Self::Input(InputType::Radio))
    }
}

/// Change handler bound to a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Qualifier checkbox toggled.
    CheckChange { qualifier: String },
    /// Command selector changed.
    CommandChange { qualifier: String },
    /// Radio branch selected: show `panel`, hide `siblings`.
    ///
    /// `qualifier` is set for the qualifier-level selector, whose change also
    /// re-evaluates dependencies.
    RadioChange {
        panel: String,
        siblings: Vec<String>,
        qualifier: Option<String>,
    },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckChange { qualifier } => write!(f, "check:{qualifier}"),
            Self::CommandChange { qualifier } => write!(f, "command:{qualifier}"),
            Self::RadioChange {
                panel, siblings, ..
            } => write!(f, "radio:{panel}|{}", siblings.join(",")),
        }
    }
}

/// 文档中的一个元素
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: Tag,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Extra attributes in output order (`name`, `min`, `placeholder`, ...).
    pub attrs: Vec<(String, String)>,
    pub value: String,
    pub checked: bool,
    pub text: String,
    pub on_change: Option<Action>,
    /// Pointer enter/leave toggles the following description paragraph.
    pub hover: bool,
    /// Schema path of the detail this control was rendered from.
    pub param_key: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            value: String::new(),
            checked: false,
            text: String::new(),
            on_change: None,
            hover: false,
            param_key: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn input(kind: InputType) -> Self {
        Self::new(Tag::Input(kind))
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds each whitespace separated class; empty input is ignored.
    #[must_use]
    pub fn with_class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn on_change(mut self, action: Action) -> Self {
        self.on_change = Some(action);
        self
    }

    #[must_use]
    pub fn with_hover(mut self, hover: bool) -> Self {
        self.hover = hover;
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.param_key = Some(key.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_hidden(&self) -> bool {
        self.has_class(super::HIDDEN)
    }

    pub(crate) fn set_class(&mut self, class: &str, on: bool) {
        if on {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        } else {
            self.classes.retain(|c| c != class);
        }
    }
}
