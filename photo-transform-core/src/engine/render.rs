//! 控件渲染：command 选择器、detail 控件、单选组

use std::sync::Arc;

use super::PhotoTransform;
use super::depends::DependsLink;
use crate::document::{Action, HIDDEN, InputType, Node, NodeId, Tag};
use crate::error::{CoreError, CoreResult};
use crate::template::{ROOT_KEY, branch_key, detail_key};
use crate::types::{ColorRange, Detail, DetailKind, ListValue, NumericRange, QualifierIds};
use crate::utils::lenient::format_number;
use crate::utils::title;

const DEFAULT_COLOR: &str = "#000000";

/// What every detail of one render pass shares.
struct Scope<'a> {
    qualifier: &'a str,
    ids: &'a QualifierIds,
    /// Command the rendered details belong to; stored as the dependent value of depends links.
    command: &'a str,
}

impl Scope<'_> {
    fn for_command<'b>(&'b self, command: &'b str) -> Scope<'b> {
        Scope {
            qualifier: self.qualifier,
            ids: self.ids,
            command,
        }
    }
}

fn hidden_class(hidden: bool) -> &'static str {
    if hidden { HIDDEN } else { "" }
}

fn with_hash(color: &str) -> String {
    if color.starts_with('#') {
        color.to_string()
    } else {
        format!("#{color}")
    }
}

impl PhotoTransform {
    /// Rebuilds the command selector and the (empty) detail box of `qualifier`.
    pub fn create_commands(&mut self, qualifier: &str) -> CoreResult<()> {
        let schema = Arc::clone(&self.schema);
        let q = schema.qualifier(qualifier)?;
        let ids = QualifierIds::new(qualifier, &q.prefix);
        let div = self.doc.require(&ids.div)?;
        self.doc.clear_children(div);

        if q.kind.is_radio() {
            let group = self.doc.append(
                div,
                Node::new(Tag::Div)
                    .with_class("group-trans")
                    .with_attr("role", "group"),
            );
            let ul = self.doc.append(
                group,
                Node::new(Tag::Ul)
                    .with_id(ids.value.clone())
                    .with_class("topic-options")
                    .with_attr("style", format!("display: {}", q.direction.display())),
            );
            let det = self.doc.append(
                div,
                Node::new(Tag::Div)
                    .with_id(ids.det.clone())
                    .with_class("item-trans"),
            );
            let scope = Scope {
                qualifier,
                ids: &ids,
                command: "",
            };
            let mut counter = 0;
            self.render_branches(&scope, &q.commands, ul, det, 0, None, &mut counter)?;
        } else {
            let described = q.description.as_deref().filter(|d| !d.is_empty());
            let holder = match described {
                Some(_) => self
                    .doc
                    .append(div, Node::new(Tag::Div).with_class("dropdown-item")),
                None => div,
            };
            let first = q
                .commands
                .first()
                .and_then(|c| c.command.clone())
                .unwrap_or_default();
            let select = self.doc.append(
                holder,
                Node::new(Tag::Select)
                    .with_id(ids.value.clone())
                    .with_class("sel-inp")
                    .with_value(first)
                    .with_hover(described.is_some())
                    .on_change(Action::CommandChange {
                        qualifier: qualifier.to_string(),
                    }),
            );
            for command in q.commands.iter().filter_map(|c| c.command.as_deref()) {
                self.doc.append(
                    select,
                    Node::new(Tag::Option).with_value(command).with_text(command),
                );
            }
            if let Some(description) = described {
                self.doc.append(
                    holder,
                    Node::new(Tag::P)
                        .with_class("dropdown-desc hidden")
                        .with_text(description),
                );
            }
            self.doc.append(
                div,
                Node::new(Tag::Div)
                    .with_id(ids.det)
                    .with_class("item-trans hidden"),
            );
        }
        Ok(())
    }

    /// Renders the details of `command` into the detail box `det`.
    pub(crate) fn render_command_details(
        &mut self,
        qualifier: &str,
        ids: &QualifierIds,
        command: &str,
        details: &[Detail],
        det: NodeId,
    ) -> CoreResult<()> {
        let scope = Scope {
            qualifier,
            ids,
            command,
        };
        let mut counter = 0;
        self.render_details(&scope, details, det, ROOT_KEY, &mut counter)
    }

    fn render_details(
        &mut self,
        scope: &Scope<'_>,
        details: &[Detail],
        parent: NodeId,
        key: &str,
        counter: &mut usize,
    ) -> CoreResult<()> {
        for (i, detail) in details.iter().enumerate() {
            self.render_detail(scope, detail, parent, &detail_key(key, i), counter)?;
        }
        Ok(())
    }

    fn render_detail(
        &mut self,
        scope: &Scope<'_>,
        detail: &Detail,
        parent: NodeId,
        key: &str,
        counter: &mut usize,
    ) -> CoreResult<()> {
        *counter += 1;
        let n = *counter;
        let hidden = detail.depends.is_some();

        let dep_id = match &detail.kind {
            None => None,
            Some(DetailKind::Radio(branches)) => {
                let group_id = scope.ids.radio_group(n);
                let wrapper = self.doc.append(
                    parent,
                    Node::new(Tag::Div)
                        .with_id(group_id.clone())
                        .with_class("group-trans")
                        .with_class(hidden_class(hidden))
                        .with_attr("role", "group"),
                );
                let ul = self.doc.append(
                    wrapper,
                    Node::new(Tag::Ul)
                        .with_class("topic-options")
                        .with_attr("style", format!("display: {}", detail.direction.display())),
                );
                self.render_branches(scope, branches, ul, wrapper, n, Some(key), counter)?;
                Some(group_id)
            }
            Some(kind) => {
                let holder = match &detail.description {
                    Some(_) => self
                        .doc
                        .append(parent, Node::new(Tag::Div).with_class("dropdown-item")),
                    None => parent,
                };
                let id = self.render_control(scope, kind, detail, holder, key, n, hidden)?;
                if let Some(description) = &detail.description {
                    self.doc.append(
                        holder,
                        Node::new(Tag::P)
                            .with_class("dropdown-desc hidden")
                            .with_text(description.clone()),
                    );
                }
                Some(id)
            }
        };

        if let (Some(depends), Some(dep_id)) = (&detail.depends, dep_id) {
            self.depends.set(DependsLink {
                dep_qualifier: scope.qualifier.to_string(),
                dep_value: scope.command.to_string(),
                dep_id,
                aff_qualifier: depends.qualifier.clone(),
                aff_value: depends.command.clone(),
            });
        }

        self.render_details(scope, &detail.details, parent, key, counter)
    }

    /// Title paragraph plus one input control; returns the control id.
    #[allow(clippy::too_many_arguments)]
    fn render_control(
        &mut self,
        scope: &Scope<'_>,
        kind: &DetailKind,
        detail: &Detail,
        parent: NodeId,
        key: &str,
        n: usize,
        hidden: bool,
    ) -> CoreResult<String> {
        let ids = scope.ids;
        let format = detail.detail.as_deref().filter(|d| !d.is_empty());
        let (id, code, control) = match kind {
            DetailKind::List(values) => (ids.list(n), "ds", list_control(values, detail.required)),
            DetailKind::RangeInt(range) => (
                ids.number(n),
                "di",
                number_control(range, false, detail.required),
            ),
            DetailKind::RangeFloat(range) => (
                ids.number(n),
                "di",
                number_control(range, true, detail.required),
            ),
            DetailKind::RangeColor(range) => {
                (ids.color(n), "dc", color_control(range, detail.required))
            }
            // groups go through render_branches
            DetailKind::Radio(_) => {
                return Err(CoreError::InvalidSchema(format!(
                    "{}: radio detail {key} is not a single control",
                    scope.qualifier
                )));
            }
        };

        if let Some(format) = format {
            let mut text = title(format, true);
            if matches!(kind, DetailKind::RangeFloat(_)) {
                text.push_str(" (%)");
            }
            self.doc.append(
                parent,
                Node::new(Tag::P)
                    .with_id(ids.title(code, n))
                    .with_class("item-trans")
                    .with_class(hidden_class(hidden))
                    .with_text(text),
            );
        }

        let control = control
            .with_id(id.clone())
            .with_class(hidden_class(hidden))
            .with_hover(detail.description.is_some())
            .with_key(key);

        let options: Vec<String> = match kind {
            DetailKind::List(values) => (!detail.required)
                .then(String::new)
                .into_iter()
                .chain(values.iter().map(|v| v.value.clone()))
                .collect(),
            _ => Vec::new(),
        };
        let nid = self.doc.append(parent, control);
        for option in options {
            self.doc.append(
                nid,
                Node::new(Tag::Option)
                    .with_value(option.clone())
                    .with_text(option),
            );
        }
        Ok(id)
    }

    /// Radio inputs into `ul`, one panel per branch into `panels`.
    ///
    /// `n == 0` renders the qualifier-level selector; `group_key` is the schema
    /// path of a detail-level group.
    #[allow(clippy::too_many_arguments)]
    fn render_branches(
        &mut self,
        scope: &Scope<'_>,
        branches: &[Detail],
        ul: NodeId,
        panels: NodeId,
        n: usize,
        group_key: Option<&str>,
        counter: &mut usize,
    ) -> CoreResult<()> {
        let ids = scope.ids;
        let name = ids.radio_name(n);
        let radio_ids: Vec<String> = (0..branches.len())
            .map(|k| ids.radio_input(n, k))
            .collect();

        for (k, branch) in branches.iter().enumerate() {
            let radio_id = &radio_ids[k];
            let label = branch
                .detail
                .as_deref()
                .or(branch.command.as_deref())
                .filter(|t| !t.is_empty())
                .or(branch.value.as_deref())
                .unwrap_or_default();
            let siblings = radio_ids
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != k)
                .map(|(_, id)| QualifierIds::panel(id))
                .collect();

            let li = self
                .doc
                .append(ul, Node::new(Tag::Li).with_class("dropdown-item"));
            let holder = match &branch.description {
                Some(_) => self.doc.append(
                    li,
                    Node::new(Tag::Div)
                        .with_id(ids.branch_item(n, k))
                        .with_hover(true),
                ),
                None => li,
            };

            let mut input = Node::input(InputType::Radio)
                .with_id(radio_id.clone())
                .with_attr("name", name.clone())
                .with_value(branch.value.clone().unwrap_or_default())
                .with_checked(k == 0)
                .on_change(Action::RadioChange {
                    panel: QualifierIds::panel(radio_id),
                    siblings,
                    qualifier: (n == 0).then(|| scope.qualifier.to_string()),
                });
            if let Some(command) = branch.command.as_deref().filter(|c| !c.is_empty()) {
                input = input.with_attr("placeholder", command);
            }
            if let Some(key) = group_key {
                input = input.with_key(key);
            }
            self.doc.append(holder, input);
            self.doc.append(
                holder,
                Node::new(Tag::Label)
                    .with_attr("for", radio_id.clone())
                    .with_text(title(label, false)),
            );
            if let Some(description) = &branch.description {
                self.doc.append(
                    li,
                    Node::new(Tag::P)
                        .with_class("dropdown-desc hidden")
                        .with_text(description.clone()),
                );
            }

            let panel = self.doc.append(
                panels,
                Node::new(Tag::Div)
                    .with_id(QualifierIds::panel(radio_id))
                    .with_class("group-inp")
                    .with_class(hidden_class(k > 0)),
            );
            // qualifier-level branches are identified like the selector value
            let command = branch
                .command
                .as_deref()
                .filter(|c| !c.is_empty())
                .or_else(|| branch.value.as_deref().filter(|_| n == 0))
                .unwrap_or(scope.command);
            let branch_scope = scope.for_command(command);
            let key = group_key.map_or_else(|| ROOT_KEY.to_string(), |g| branch_key(g, k));
            self.render_detail(&branch_scope, branch, panel, &key, counter)?;
        }
        Ok(())
    }
}

fn list_control(values: &[ListValue], required: bool) -> Node {
    let first = if required {
        values.first().map(|v| v.value.clone()).unwrap_or_default()
    } else {
        String::new()
    };
    Node::new(Tag::Select).with_class("sel-inp").with_value(first)
}

fn number_control(range: &NumericRange, is_float: bool, required: bool) -> Node {
    let scale = |v: f64| if is_float { v * 100.0 } else { v };
    let mut node = Node::input(InputType::Number).with_class("group-inp");
    if let Some(min) = range.min {
        node = node.with_attr("min", format_number(scale(min)));
    }
    if let Some(max) = range.max {
        node = node.with_attr("max", format_number(scale(max)));
    }
    if required {
        node = node.with_attr("required", "");
    }
    let value = match range.default {
        Some(default) => format_number(scale(default)),
        None if required => format_number(range.min.map_or(0.0, scale)),
        None => String::new(),
    };
    node.with_value(value)
}

fn color_control(range: &ColorRange, required: bool) -> Node {
    let value = match range.default.as_deref().filter(|d| !d.is_empty()) {
        Some(default) => with_hash(default),
        None if required => DEFAULT_COLOR.to_string(),
        None => String::new(),
    };
    Node::input(InputType::Color)
        .with_class("sel-inp")
        .with_value(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture_schema, form};

    #[test]
    fn test_radio_kind_is_rejected_as_single_control() {
        let mut engine = form(&[]);
        let detail: Detail = serde_json::from_str(r#"{"radio": [{"value": "a"}]}"#).unwrap();
        let kind = detail.kind.clone().unwrap();
        let ids = QualifierIds::new("crop", "c");
        let scope = Scope {
            qualifier: "crop",
            ids: &ids,
            command: "fill",
        };
        let root = engine.document().root();
        let err = engine
            .render_control(&scope, &kind, &detail, root, ROOT_KEY, 1, false)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSchema(_)));
        assert!(engine.document().find("c_dc1").is_none());
    }

    #[test]
    fn test_list_qualifier_selector() {
        let engine = form(&[]);
        let doc = engine.document();
        let select = doc.find("c_value").unwrap();
        let options: Vec<_> = doc
            .children(select)
            .iter()
            .map(|&o| doc.get(o).unwrap().value.clone())
            .collect();
        assert_eq!(options, vec!["fill", "scale", "thumb"]);
        let det = doc.find("c_det").unwrap();
        assert!(doc.is_hidden(det));
        assert!(doc.children(det).is_empty());

        // described qualifier: select + description in a dropdown-item wrapper
        let desc = doc.next_sibling(select).unwrap();
        assert!(doc.get(desc).unwrap().has_class("dropdown-desc"));
        assert!(doc.get(select).unwrap().hover);
    }

    #[test]
    fn test_number_controls_after_command_change() {
        let engine = form(&[("crop", "thumb")]);
        let doc = engine.document();
        let zoom = doc.by_id("c_di1").unwrap();
        assert_eq!(zoom.attr("min"), Some("10"));
        assert_eq!(zoom.attr("max"), Some("200"));
        assert_eq!(zoom.value, "100");
        assert_eq!(zoom.param_key.as_deref(), Some("$.d0"));
        assert_eq!(doc.by_id("cp_di1").unwrap().text, "Zoom (%)");
        assert!(!doc.is_hidden(doc.find("c_det").unwrap()));
    }

    #[test]
    fn test_required_defaults() {
        let engine = form(&[("crop", "scale"), ("effect", "e_colorize")]);
        let doc = engine.document();
        let width = doc.by_id("c_di1").unwrap();
        assert_eq!(width.attr("required"), Some(""));
        assert_eq!(width.value, "1");
        assert_eq!(doc.by_id("c_di2").unwrap().value, "");
        assert_eq!(doc.by_id("e_dc2").unwrap().value, "#ff0000");
    }

    #[test]
    fn test_list_control_options() {
        let engine = form(&[("effect", "e_art")]);
        let doc = engine.document();
        let select = doc.find("e_ds1").unwrap();
        let values: Vec<_> = doc
            .children(select)
            .iter()
            .map(|&o| doc.get(o).unwrap().value.clone())
            .collect();
        // not required: leading empty option
        assert_eq!(values, vec!["", "athena", "zorro"]);
        assert_eq!(doc.get(select).unwrap().tag, Tag::Select);
    }

    #[test]
    fn test_radio_qualifier_renders_panels() {
        let engine = form(&[]);
        let doc = engine.document();
        let first = doc.by_id("bor_0").unwrap();
        assert!(first.checked);
        assert_eq!(first.value, "A");
        assert!(!doc.by_id("bor_1").unwrap().checked);
        assert!(!doc.is_hidden(doc.find("bor_0d").unwrap()));
        assert!(doc.is_hidden(doc.find("bor_1d").unwrap()));
        // branch A: its own node takes n=1, its details 2 and 3
        assert!(doc.find("bo_di2").is_some());
        assert!(doc.find("bo_di3").is_some());
        let ul = doc.find("bo_value").unwrap();
        assert_eq!(doc.get(ul).unwrap().attr("style"), Some("display: flex"));
    }

    #[test]
    fn test_detail_radio_group() {
        let engine = form(&[("quality", "q")]);
        let doc = engine.document();
        let wrapper = doc.find("qr_radio1").unwrap();
        assert!(doc.get(wrapper).unwrap().has_class("group-trans"));
        let auto = doc.by_id("qr1_0").unwrap();
        assert_eq!(auto.param_key.as_deref(), Some("$.d0"));
        assert_eq!(auto.attr("name"), Some("qr_radio1"));
        assert!(doc.is_hidden(doc.find("qr1_1d").unwrap()));
        assert_eq!(doc.by_id("q_di3").unwrap().param_key.as_deref(), Some("$.d0.r1"));
    }

    #[test]
    fn test_ids_unique_and_stable() {
        let mut engine = form(&[("effect", "e_colorize")]);
        let before = engine.to_html();
        engine.command_change("effect").unwrap();
        assert_eq!(engine.to_html(), before);

        let doc = engine.document();
        let mut seen = std::collections::HashSet::new();
        for nid in doc.descendants(doc.root()) {
            if let Some(id) = &doc.get(nid).unwrap().id {
                assert!(seen.insert(id.clone()), "duplicate id {id}");
            }
        }
        assert!(fixture_schema().names().all(|n| seen.contains(n)));
    }

    #[test]
    fn test_depends_detail_starts_hidden() {
        let engine = form(&[("gravity", "north")]);
        let doc = engine.document();
        let offset = doc.find("g_di1").unwrap();
        assert!(doc.is_hidden(offset));
        assert!(doc.is_hidden(doc.find("gp_di1").unwrap()));
        assert_eq!(engine.depends().len(), 2);
    }
}
