//! 模板提取：把 command 的 detail 树展开为有序参数列表
//!
//! The order is depth-first and matches the order in which the renderer emits
//! controls, which is what lets encode/decode pair parameters with controls.

use crate::types::{Command, Detail, DetailKind, ParamKind, ParamParent, Parameter};

/// Schema path of a command root.
pub const ROOT_KEY: &str = "$";

/// Flattens `command` into its parameter list.
pub fn extract(command: &Command) -> Vec<Parameter> {
    let mut params = Vec::new();
    walk(command, 0, ParamParent::Root, ROOT_KEY, &mut params);
    params
}

/// Key of sub-detail `index` under `key`.
pub fn detail_key(key: &str, index: usize) -> String {
    format!("{key}.d{index}")
}

/// Key of radio branch `index` under `key`.
pub fn branch_key(key: &str, index: usize) -> String {
    format!("{key}.r{index}")
}

/// Kind of the value a node carries itself; the `radio_value` marker wins.
fn own_kind(node: &Detail) -> Option<ParamKind> {
    if node.radio_value {
        return Some(ParamKind::RadioValue);
    }
    match node.kind.as_ref()? {
        DetailKind::List(_) => Some(ParamKind::List),
        DetailKind::RangeInt(_) => Some(ParamKind::Int),
        DetailKind::RangeFloat(_) => Some(ParamKind::Float),
        DetailKind::RangeColor(_) => Some(ParamKind::Color),
        DetailKind::Radio(_) => None,
    }
}

fn walk(node: &Detail, level: usize, parent: ParamParent, key: &str, out: &mut Vec<Parameter>) {
    let format = node.format();

    if let (Some(format), Some(kind)) = (format, own_kind(node)) {
        out.push(Parameter {
            kind,
            format: format.to_string(),
            level,
            parent,
            key: key.to_string(),
        });
    }

    if let Some(branches) = node.radio_branches() {
        out.push(Parameter {
            kind: ParamKind::Radio,
            format: format.unwrap_or_default().to_string(),
            level,
            parent,
            key: key.to_string(),
        });
        for (i, branch) in branches.iter().enumerate() {
            walk(branch, level + 1, ParamParent::Radio, &branch_key(key, i), out);
        }
    }

    let child_parent = if level > 0 { ParamParent::Details } else { parent };
    for (i, detail) in node.details.iter().enumerate() {
        walk(detail, level + 1, child_parent, &detail_key(key, i), out);
    }
}
