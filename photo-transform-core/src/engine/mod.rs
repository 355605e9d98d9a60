//! Rendering context of the photo-transform form.
//!
//! [`PhotoTransform`] owns the schema, the stored transform data, the control
//! [`Document`] and the dependency list. Rendering, event handling and the
//! encode/decode paths are split over the submodules as `impl` blocks.

mod codec;
mod depends;
mod events;
mod render;

use std::sync::Arc;

pub use codec::{Element, collect_elements, sync_elements};
pub use depends::{DependsLink, DependsList};
pub use events::UiEvent;

use crate::document::{Action, Document, InputType, Node, NodeId, Tag};
use crate::error::{CoreError, CoreResult};
use crate::types::{Command, Qualifier, QualifierIds, TransData, TransformSchema};
use crate::utils::title;

/// Default id of the `ul` holding one `li` per qualifier.
pub const DEFAULT_LIST_ID: &str = "qualifiers";

/// 表单上下文：schema + 已保存数据 + 控件树 + 依赖表
#[derive(Debug, Clone)]
pub struct PhotoTransform {
    schema: Arc<TransformSchema>,
    trans_data: TransData,
    list_id: String,
    doc: Document,
    depends: DependsList,
}

/// Command currently selected in a qualifier's selector.
pub(crate) struct ActiveCommand<'s> {
    pub command: &'s Command,
    /// Select value, or the checked branch's value for radio selectors.
    pub token: String,
    pub is_radio: bool,
}

impl PhotoTransform {
    pub fn new(schema: Arc<TransformSchema>, trans_data: TransData) -> Self {
        Self {
            schema,
            trans_data,
            list_id: DEFAULT_LIST_ID.to_string(),
            doc: Document::new(),
            depends: DependsList::default(),
        }
    }

    /// Overrides the id of the qualifier list element.
    #[must_use]
    pub fn with_list_id(mut self, list_id: impl Into<String>) -> Self {
        self.list_id = list_id.into();
        self
    }

    pub fn schema(&self) -> &TransformSchema {
        &self.schema
    }

    pub fn trans_data(&self) -> &TransData {
        &self.trans_data
    }

    /// Replaces the stored data, e.g. with the body of a successful submit.
    pub fn set_trans_data(&mut self, trans_data: TransData) {
        self.trans_data = trans_data;
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn depends(&self) -> &DependsList {
        &self.depends
    }

    pub fn to_html(&self) -> String {
        self.doc.to_html()
    }

    /// Renders one `li` per qualifier, then restores every qualifier from the stored data.
    pub fn setup(&mut self) -> CoreResult<()> {
        let schema = Arc::clone(&self.schema);
        self.doc = Document::new();
        let list = self.doc.append(
            self.doc.root(),
            Node::new(Tag::Ul).with_id(self.list_id.clone()),
        );

        for (name, qualifier) in schema.qualifiers() {
            let ids = QualifierIds::new(name, &qualifier.prefix);
            let li = self.doc.append(list, Node::new(Tag::Li).with_class("li-trans"));
            self.doc.append(
                li,
                Node::input(InputType::Checkbox)
                    .with_id(ids.checkbox.clone())
                    .with_attr("name", "topic")
                    .with_value(name.clone())
                    .on_change(Action::CheckChange {
                        qualifier: name.clone(),
                    }),
            );
            self.doc.append(
                li,
                Node::new(Tag::Label)
                    .with_attr("for", name.clone())
                    .with_text(title(name, true)),
            );
            self.doc.append(
                li,
                Node::new(Tag::Div)
                    .with_id(ids.div)
                    .with_class("item-trans hidden"),
            );
        }

        for name in schema.names() {
            self.set_command_values(name)?;
        }
        log::debug!(
            "Form set up: {} qualifiers, {} depends links",
            schema.qualifiers().len(),
            self.depends.len()
        );
        Ok(())
    }

    /// Re-runs [`Self::setup`] from the stored data.
    pub fn reset(&mut self) -> CoreResult<()> {
        if self.trans_data.is_empty() {
            log::info!("Clear form elements");
        } else {
            log::info!("Restore form elements");
        }
        self.setup()
    }

    /// Whether the qualifier checkbox is checked.
    pub fn is_checked(&self, qualifier: &str) -> bool {
        self.doc.by_id(qualifier).is_some_and(|n| n.checked)
    }

    pub(crate) fn ids(&self, qualifier: &str) -> CoreResult<QualifierIds> {
        let q = self.schema.qualifier(qualifier)?;
        Ok(QualifierIds::new(qualifier, &q.prefix))
    }

    /// First checked radio input under `group`.
    pub(crate) fn checked_radio(&self, group: NodeId) -> Option<NodeId> {
        self.doc.descendants(group).into_iter().find(|&nid| {
            self.doc
                .get(nid)
                .is_some_and(|n| n.tag.is_radio() && n.checked)
        })
    }

    /// Value of a command selector: the select value, or for a radio group the
    /// checked branch's command (falling back to its value).
    pub(crate) fn element_value(&self, id: &str) -> Option<String> {
        let nid = self.doc.find(id)?;
        let node = self.doc.get(nid)?;
        if node.tag != Tag::Ul {
            return Some(node.value.clone());
        }
        let radio = self.doc.get(self.checked_radio(nid)?)?;
        Some(
            radio
                .attr("placeholder")
                .filter(|c| !c.is_empty())
                .unwrap_or(&radio.value)
                .to_string(),
        )
    }

    /// Resolves the selected command of `qualifier`.
    pub(crate) fn active_command<'s>(
        &self,
        name: &str,
        qualifier: &'s Qualifier,
        ids: &QualifierIds,
    ) -> CoreResult<ActiveCommand<'s>> {
        let selector = self.doc.require(&ids.value)?;
        let is_radio = self.doc.get(selector).is_some_and(|n| n.tag == Tag::Ul);

        let (command, token) = if is_radio {
            let radio = self
                .checked_radio(selector)
                .and_then(|nid| self.doc.get(nid))
                .ok_or_else(|| {
                    CoreError::ElementNotFound(format!("{}:checked", ids.value))
                })?;
            (
                radio.attr("placeholder").unwrap_or_default().to_string(),
                radio.value.clone(),
            )
        } else {
            let value = self
                .doc
                .get(selector)
                .map(|n| n.value.clone())
                .unwrap_or_default();
            (value.clone(), value)
        };

        let found = if command.is_empty() {
            None
        } else {
            qualifier.find_command(&command)
        };
        let command = found
            .or_else(|| qualifier.find_branch(&token))
            .ok_or_else(|| CoreError::CommandNotFound {
                qualifier: name.to_string(),
                command: if command.is_empty() { token.clone() } else { command },
            })?;

        Ok(ActiveCommand {
            command,
            token,
            is_radio,
        })
    }
}
