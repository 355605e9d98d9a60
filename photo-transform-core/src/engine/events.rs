//! UI 事件处理：勾选、命令切换、单选切换、悬停说明

use std::sync::Arc;

use super::PhotoTransform;
use crate::document::{Action, HIDDEN, NodeId, Tag};
use crate::error::{CoreError, CoreResult};

/// Input coming from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A checkbox or radio input was toggled.
    Check { id: String, checked: bool },
    /// A select, number or color input was edited.
    Input { id: String, value: String },
    PointerEnter(String),
    PointerLeave(String),
}

impl PhotoTransform {
    /// Applies `event` to the document and runs the bound change handler.
    pub fn dispatch(&mut self, event: UiEvent) -> CoreResult<()> {
        match event {
            UiEvent::Check { id, checked } => {
                let nid = self.doc.require(&id)?;
                if checked && self.doc.get(nid).is_some_and(|n| n.tag.is_radio()) {
                    self.check_radio(nid)
                } else {
                    self.set_checked(nid, checked);
                    self.fire_change(nid)
                }
            }
            UiEvent::Input { id, value } => {
                let nid = self.doc.require(&id)?;
                if let Some(node) = self.doc.get_mut(nid) {
                    node.value = value;
                }
                self.fire_change(nid)
            }
            UiEvent::PointerEnter(id) => {
                self.toggle_hover(&id, true);
                Ok(())
            }
            UiEvent::PointerLeave(id) => {
                self.toggle_hover(&id, false);
                Ok(())
            }
        }
    }

    fn fire_change(&mut self, nid: NodeId) -> CoreResult<()> {
        let Some(action) = self.doc.get(nid).and_then(|n| n.on_change.clone()) else {
            return Ok(());
        };
        match action {
            Action::CheckChange { qualifier } => self.check_change(&qualifier),
            Action::CommandChange { qualifier } => self.command_change(&qualifier),
            Action::RadioChange {
                panel,
                siblings,
                qualifier,
            } => {
                self.radio_change(nid, &panel, &siblings);
                match qualifier {
                    Some(qualifier) => self.toggle_depends(&qualifier),
                    None => Ok(()),
                }
            }
        }
    }

    pub(crate) fn set_checked(&mut self, nid: NodeId, checked: bool) {
        if let Some(node) = self.doc.get_mut(nid) {
            node.checked = checked;
        }
    }

    /// Checks a radio input, unchecks the rest of its group and fires its change.
    fn check_radio(&mut self, nid: NodeId) -> CoreResult<()> {
        let name = self
            .doc
            .get(nid)
            .and_then(|n| n.attr("name"))
            .map(str::to_string);
        if let (Some(name), Some(group)) = (name, self.doc.closest(nid, Tag::Ul)) {
            for other in self.doc.descendants(group) {
                let same_group = self
                    .doc
                    .get(other)
                    .is_some_and(|n| n.tag.is_radio() && n.attr("name") == Some(name.as_str()));
                if same_group && other != nid {
                    self.set_checked(other, false);
                }
            }
        }
        self.set_checked(nid, true);
        self.fire_change(nid)
    }

    /// Qualifier checkbox toggled: show/hide its box and refresh the command.
    pub fn check_change(&mut self, qualifier: &str) -> CoreResult<()> {
        let ids = self.ids(qualifier)?;
        let checked = self.is_checked(qualifier);
        let div = self.doc.require(&ids.div)?;
        if checked {
            self.doc.set_hidden(div, false);
        }
        match self.doc.by_id(&ids.value).map(|n| n.tag) {
            Some(Tag::Select) => self.command_change(qualifier)?,
            Some(Tag::Ul) => self.toggle_depends(qualifier)?,
            _ => {}
        }
        if !checked {
            self.doc.set_hidden(div, true);
        }
        Ok(())
    }

    /// Command selector changed: rebuild the detail box for the new command.
    pub fn command_change(&mut self, qualifier: &str) -> CoreResult<()> {
        let schema = Arc::clone(&self.schema);
        let q = schema.qualifier(qualifier)?;
        let ids = self.ids(qualifier)?;
        let value = self.element_value(&ids.value).unwrap_or_default();
        let det = self.doc.require(&ids.det)?;

        if self.doc.by_id(&ids.value).is_some_and(|n| n.tag == Tag::Ul) {
            return self.toggle_depends(qualifier);
        }

        self.doc.clear_children(det);
        let details = if value.is_empty() {
            &[][..]
        } else {
            let command = q
                .find_command(&value)
                .ok_or_else(|| CoreError::CommandNotFound {
                    qualifier: qualifier.to_string(),
                    command: value.clone(),
                })?;
            command.details.as_slice()
        };

        if details.is_empty() {
            self.doc.set_hidden(det, true);
        } else {
            self.render_command_details(qualifier, &ids, &value, details, det)?;
            self.doc.set_hidden(det, false);
        }
        self.toggle_depends(qualifier)
    }

    /// Shows the panel of a checked radio input and hides the other panels.
    fn radio_change(&mut self, radio: NodeId, panel: &str, siblings: &[String]) {
        if self.doc.get(radio).is_some_and(|n| n.checked) {
            self.doc.set_hidden_by_id(panel, false);
        }
        for sibling in siblings {
            self.doc.set_hidden_by_id(sibling, true);
        }
    }

    /// Selects the radio input of `group` whose value equals `value`.
    ///
    /// When none matches, the first input with an empty value is selected
    /// instead. Returns whether a match was found.
    pub(crate) fn select_radio(&mut self, group: NodeId, value: &str) -> CoreResult<bool> {
        let radios: Vec<NodeId> = self
            .doc
            .descendants(group)
            .into_iter()
            .filter(|&nid| self.doc.get(nid).is_some_and(|n| n.tag.is_radio()))
            .collect();

        let mut fallback = None;
        let mut found = None;
        for &nid in &radios {
            let radio_value = self.doc.get(nid).map(|n| n.value.as_str()).unwrap_or_default();
            if radio_value.is_empty() && fallback.is_none() {
                fallback = Some(nid);
            }
            if found.is_none() && radio_value == value {
                found = Some(nid);
            }
        }

        match found.or(fallback) {
            Some(target) => {
                for &nid in &radios {
                    self.set_checked(nid, nid == target);
                }
                self.fire_change(target)?;
                Ok(found.is_some())
            }
            None => Ok(false),
        }
    }

    /// Selects the radio branches whose hidden panels contain `nid`.
    pub(crate) fn reveal_branch(&mut self, nid: NodeId) -> CoreResult<()> {
        let mut current = self.doc.parent(nid);
        while let Some(ancestor) = current {
            let radio_id = self.doc.get(ancestor).and_then(|n| {
                let is_closed_panel = n.tag == Tag::Div && n.has_class("group-inp") && n.has_class(HIDDEN);
                if is_closed_panel {
                    n.id.as_deref()?.strip_suffix('d').map(str::to_string)
                } else {
                    None
                }
            });
            if let Some(radio) = radio_id.and_then(|id| self.doc.find(&id))
                && self.doc.get(radio).is_some_and(|n| n.tag.is_radio())
            {
                self.check_radio(radio)?;
            }
            current = self.doc.parent(ancestor);
        }
        Ok(())
    }

    /// Shows or hides the description paragraph right after `id`.
    fn toggle_hover(&mut self, id: &str, show: bool) {
        let Some(nid) = self.doc.find(id) else {
            return;
        };
        if !self.doc.get(nid).is_some_and(|n| n.hover) {
            return;
        }
        if let Some(desc) = self.doc.next_sibling(nid)
            && self.doc.get(desc).is_some_and(|n| n.tag == Tag::P)
        {
            self.doc.set_hidden(desc, !show);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::form;

    fn check(engine: &mut PhotoTransform, id: &str, checked: bool) {
        engine
            .dispatch(UiEvent::Check {
                id: id.into(),
                checked,
            })
            .unwrap();
    }

    #[test]
    fn test_check_change_toggles_box() {
        let mut engine = form(&[]);
        check(&mut engine, "crop", true);
        let doc = engine.document();
        assert!(!doc.is_hidden(doc.find("c_div").unwrap()));

        check(&mut engine, "crop", false);
        let doc = engine.document();
        assert!(doc.is_hidden(doc.find("c_div").unwrap()));
    }

    #[test]
    fn test_command_change_rebuilds_details() {
        let mut engine = form(&[]);
        check(&mut engine, "crop", true);
        engine
            .dispatch(UiEvent::Input {
                id: "c_value".into(),
                value: "scale".into(),
            })
            .unwrap();
        assert!(engine.document().find("c_di2").is_some());

        engine
            .dispatch(UiEvent::Input {
                id: "c_value".into(),
                value: "fill".into(),
            })
            .unwrap();
        let doc = engine.document();
        assert!(doc.find("c_di1").is_none());
        assert!(doc.is_hidden(doc.find("c_det").unwrap()));
    }

    #[test]
    fn test_unknown_command_is_reported() {
        let mut engine = form(&[]);
        let err = engine
            .dispatch(UiEvent::Input {
                id: "c_value".into(),
                value: "zoom".into(),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::CommandNotFound { .. }));
        assert!(err.is_expected());
    }

    #[test]
    fn test_radio_change_switches_panels() {
        let mut engine = form(&[]);
        check(&mut engine, "bor_1", true);
        let doc = engine.document();
        assert!(doc.by_id("bor_1").unwrap().checked);
        assert!(!doc.by_id("bor_0").unwrap().checked);
        assert!(!doc.is_hidden(doc.find("bor_1d").unwrap()));
        assert!(doc.is_hidden(doc.find("bor_0d").unwrap()));
    }

    #[test]
    fn test_hover_toggles_description() {
        let mut engine = form(&[]);
        let desc = {
            let doc = engine.document();
            doc.next_sibling(doc.find("c_value").unwrap()).unwrap()
        };
        assert!(engine.document().is_hidden(desc));
        engine
            .dispatch(UiEvent::PointerEnter("c_value".into()))
            .unwrap();
        assert!(!engine.document().is_hidden(desc));
        engine
            .dispatch(UiEvent::PointerLeave("c_value".into()))
            .unwrap();
        assert!(engine.document().is_hidden(desc));
    }

    #[test]
    fn test_missing_element_is_an_error() {
        let mut engine = form(&[]);
        let err = engine
            .dispatch(UiEvent::Check {
                id: "nope".into(),
                checked: true,
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::ElementNotFound(_)));
    }

    #[test]
    fn test_select_radio_falls_back_to_empty_value() {
        let mut engine = form(&[("quality", "q")]);
        let group = engine
            .document()
            .closest(engine.document().find("qr1_0").unwrap(), Tag::Ul)
            .unwrap();
        assert!(!engine.select_radio(group, "best").unwrap());
        assert!(engine.document().by_id("qr1_1").unwrap().checked);
        assert!(engine.select_radio(group, "auto").unwrap());
        assert!(engine.document().by_id("qr1_0").unwrap().checked);
    }
}
