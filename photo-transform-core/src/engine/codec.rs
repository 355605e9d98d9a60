//! Encode / decode between live controls and the compact string format.
//!
//! A qualifier is stored as `<command><fragment>...`, each fragment being a
//! detail format with its placeholder replaced by the control value, e.g.
//! `scale:800:600`. Radio selectors store `<branch value>||<payload>`.
//!
//! Parameters (from [`crate::template::extract`]) and controls (from
//! [`collect_elements`]) are paired positionally after [`sync_elements`].

use std::sync::Arc;

use super::PhotoTransform;
use crate::document::{Document, NodeId, Tag};
use crate::error::CoreResult;
use crate::template;
use crate::types::{ParamKind, Parameter, TransformBody};
use crate::utils::placeholder;

/// Separator between a radio branch value and its payload.
pub const BRANCH_SEPARATOR: &str = "||";
/// Stored token that merges with the following one (`rgb:<hex>`).
const RGB_SENTINEL: &str = "rgb";

/// A collected control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub node: NodeId,
    pub value: String,
    /// The control or one of its containers is hidden.
    pub hidden: bool,
    pub key: Option<String>,
}

/// Collects `input`/`select` controls under `container` in document order.
///
/// Radio inputs count only when checked. With `skip_hidden`, hidden direct
/// children of `container` are skipped; deeper hidden containers only flag
/// their controls as hidden.
pub fn collect_elements(doc: &Document, container: NodeId, skip_hidden: bool) -> Vec<Element> {
    let mut out = Vec::new();
    collect_into(doc, container, skip_hidden, &mut out);
    out
}

fn collect_into(doc: &Document, container: NodeId, skip_hidden: bool, out: &mut Vec<Element>) {
    for &child in doc.children(container) {
        let Some(node) = doc.get(child) else {
            continue;
        };
        let hidden = node.is_hidden();
        if skip_hidden && hidden {
            continue;
        }
        if node.tag.is_control() {
            if !node.tag.is_radio() || node.checked {
                out.push(Element {
                    node: child,
                    value: node.value.clone(),
                    hidden,
                    key: node.param_key.clone(),
                });
            }
        } else if !doc.children(child).is_empty() {
            let start = out.len();
            collect_into(doc, child, false, out);
            if hidden {
                for element in &mut out[start..] {
                    element.hidden = true;
                }
            }
        }
    }
}

/// Reconciles a control list that is shorter than the parameter list.
///
/// A radio group yields one control (its checked input) but two parameters
/// (`radio` and the first `radio_value`). The `radio` control is copied into
/// the `radio_value` slot.
pub fn sync_elements(params: &[Parameter], elements: Vec<Element>) -> Vec<Element> {
    if params.len() <= elements.len() {
        return elements;
    }
    let mut radio = None;
    let mut radio_value = None;
    for (i, param) in params.iter().enumerate() {
        match param.kind {
            ParamKind::Radio => radio = Some(i),
            ParamKind::RadioValue => {
                radio_value = Some(i);
                break;
            }
            _ => {}
        }
    }
    let (Some(radio), Some(radio_value)) = (radio, radio_value) else {
        return elements;
    };

    let mut synced = Vec::with_capacity(params.len());
    let mut source = elements.iter();
    for slot in 0..params.len() {
        let element = if slot == radio_value {
            elements.get(radio)
        } else {
            source.next()
        };
        match element {
            Some(element) => synced.push(element.clone()),
            None => break,
        }
    }
    synced
}

fn log_key_mismatch(qualifier: &str, param: &Parameter, element: &Element) {
    if param.kind == ParamKind::RadioValue {
        return;
    }
    if let Some(key) = &element.key
        && *key != param.key
    {
        log::debug!(
            "[{qualifier}] parameter {} ({}) paired with control rendered for {key}",
            param.key,
            param.kind
        );
    }
}

/// One fragment of the payload, or `None` when the parameter contributes nothing.
fn encode_fragment(param: &Parameter, element: &Element) -> Option<String> {
    if param.kind == ParamKind::Radio {
        if param.format.is_empty() || element.value.is_empty() {
            return None;
        }
        return Some(placeholder::fill(&param.format, &element.value));
    }
    if element.hidden || element.value.is_empty() {
        return None;
    }
    let value = param.kind.encode_value(&element.value)?;
    Some(placeholder::fill(&param.format, &value))
}

impl PhotoTransform {
    /// Encodes the current state of one qualifier.
    pub fn create_param_body(&self, qualifier: &str) -> CoreResult<String> {
        let schema = Arc::clone(&self.schema);
        let q = schema.qualifier(qualifier)?;
        let ids = self.ids(qualifier)?;
        let active = self.active_command(qualifier, q, &ids)?;

        let params = template::extract(active.command);
        let det = self.doc.require(&ids.det)?;
        let elements = sync_elements(
            &params,
            collect_elements(&self.doc, det, active.is_radio),
        );

        let mut payload = String::new();
        for (param, element) in params.iter().zip(&elements) {
            log_key_mismatch(qualifier, param, element);
            if let Some(fragment) = encode_fragment(param, element) {
                payload.push_str(&fragment);
            }
        }

        let token = active.token;
        if active.is_radio && (!payload.is_empty() || placeholder::has_placeholder(&token)) {
            Ok(format!("{token}{BRANCH_SEPARATOR}{payload}"))
        } else {
            Ok(format!("{token}{payload}"))
        }
    }

    /// Encodes every checked qualifier, in schema order.
    pub fn create_body(&self) -> CoreResult<TransformBody> {
        let mut body = TransformBody::new();
        for name in self.schema.names() {
            if self.is_checked(name) {
                body.insert(name, self.create_param_body(name)?);
            }
        }
        log::debug!("Transform body: {body:?}");
        Ok(body)
    }

    /// Re-renders `qualifier` and restores it from the stored data.
    ///
    /// Unknown commands and tokens that match no parameter are skipped and
    /// logged; the form is left partially populated.
    pub fn set_command_values(&mut self, qualifier: &str) -> CoreResult<()> {
        let schema = Arc::clone(&self.schema);
        let q = schema.qualifier(qualifier)?;
        let ids = self.ids(qualifier)?;
        let stored = self.trans_data.get(qualifier).map(str::to_string);

        self.create_commands(qualifier)?;
        let checkbox = self.doc.require(&ids.checkbox)?;
        let Some(stored) = stored.filter(|s| !s.is_empty()) else {
            self.set_checked(checkbox, false);
            return self.check_change(qualifier);
        };
        self.set_checked(checkbox, true);
        self.check_change(qualifier)?;

        let mut tokens: Vec<String> = stored.split(':').map(str::to_string).collect();
        let selector = self.doc.require(&ids.value)?;
        let is_radio = self.doc.get(selector).is_some_and(|n| n.tag == Tag::Ul);

        if is_radio {
            let head = tokens.first().cloned().unwrap_or_default();
            let mut parts = head.split(BRANCH_SEPARATOR).map(str::to_string);
            let branch = parts.next().unwrap_or_default();
            let payload: Vec<String> = parts.filter(|p| !p.is_empty()).collect();
            tokens.splice(0..1, std::iter::once(branch.clone()).chain(payload));
            if !self.select_radio(selector, &branch)? {
                log::debug!("[{qualifier}] no radio branch for '{branch}', using fallback");
            }
        } else {
            let command = tokens.first().cloned().unwrap_or_default();
            if q.find_command(&command).is_none() {
                log::debug!("[{qualifier}] stored command '{command}' not in schema, skipped");
                return Ok(());
            }
            if let Some(node) = self.doc.get_mut(selector) {
                node.value = command;
            }
            self.command_change(qualifier)?;
        }

        let active = self.active_command(qualifier, q, &ids)?;
        let params = template::extract(active.command);
        let det = self.doc.require(&ids.det)?;
        let elements = sync_elements(&params, collect_elements(&self.doc, det, is_radio));

        let mut k = 1;
        for (param, element) in params.iter().zip(&elements) {
            if k >= tokens.len() {
                break;
            }
            let mut token = tokens[k].clone();
            if token == RGB_SENTINEL {
                if let Some(next) = tokens.get(k + 1) {
                    token = format!("{RGB_SENTINEL}:#{}", next.trim_start_matches('#'));
                    tokens.splice(k..=k + 1, std::iter::once(token.clone()));
                }
            } else if param.kind.splits_multi_value() {
                let separator = if token.contains(',') { ',' } else { ';' };
                if token.find(separator).is_some_and(|idx| idx > 0) {
                    let parts: Vec<String> = token.split(separator).map(str::to_string).collect();
                    token = parts.first().cloned().unwrap_or_default();
                    tokens.splice(k..=k, parts);
                }
            }

            let format = param.bare_format();
            if param.kind == ParamKind::Radio && format.is_empty() {
                continue;
            }
            let Some(value) = placeholder::extract(format, param.kind.value_pattern(), &token)
            else {
                log::debug!(
                    "[{qualifier}] token '{token}' does not match {} '{}'",
                    param.kind,
                    param.format
                );
                continue;
            };

            if param.kind.selects_branch() {
                let group = self.doc.closest(element.node, Tag::Ul);
                if let Some(group) = group
                    && self.select_radio(group, &value)?
                {
                    k += 1;
                }
            } else if let Some(decoded) = param.kind.decode_value(&value) {
                if let Some(node) = self.doc.get_mut(element.node) {
                    node.value = decoded;
                }
                self.reveal_branch(element.node)?;
                k += 1;
            }
        }
        Ok(())
    }
}
