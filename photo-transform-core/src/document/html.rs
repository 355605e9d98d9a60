//! HTML serialization of the control tree.

use super::{Document, InputType, NodeId, Tag};

/// Appends `text` to `out`, escaping `&`, `<`, `>`, `"` and `'`.
///
/// Covers both text content and double-quoted attribute values.
fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// ` name="value"`, or a bare ` name` for an empty value.
fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    if !value.is_empty() {
        out.push_str("=\"");
        escape_into(out, value);
        out.push('"');
    }
}

impl Document {
    /// Markup of everything under the root.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.root()) {
            self.write_node(child, None, &mut out);
        }
        out
    }

    /// Markup of `nid` and its subtree.
    pub fn html_of(&self, nid: NodeId) -> String {
        let mut out = String::new();
        self.write_node(nid, None, &mut out);
        out
    }

    fn write_node(&self, nid: NodeId, selected: Option<&str>, out: &mut String) {
        let Some(node) = self.get(nid) else {
            return;
        };
        let tag = node.tag.name();
        out.push('<');
        out.push_str(tag);
        if let Tag::Input(kind) = node.tag {
            push_attr(out, "type", kind.as_str());
        }
        if let Some(id) = &node.id {
            push_attr(out, "id", id);
        }
        if !node.classes.is_empty() {
            push_attr(out, "class", &node.classes.join(" "));
        }
        for (name, value) in &node.attrs {
            push_attr(out, name, value);
        }
        if matches!(node.tag, Tag::Input(_) | Tag::Option)
            && !(node.tag == Tag::Input(InputType::Number) && node.value.is_empty())
        {
            // value="" must stay explicit on options and text-like inputs
            out.push_str(" value=\"");
            escape_into(out, &node.value);
            out.push('"');
        }
        if node.checked {
            out.push_str(" checked");
        }
        if node.tag == Tag::Option && selected == Some(node.value.as_str()) {
            out.push_str(" selected");
        }
        if let Some(action) = &node.on_change {
            push_attr(out, "data-change", &action.to_string());
        }
        if node.hover {
            out.push_str(" data-hover");
        }
        out.push('>');

        if matches!(node.tag, Tag::Input(_)) {
            return;
        }
        escape_into(out, &node.text);
        let selected = (node.tag == Tag::Select).then_some(node.value.as_str());
        for &child in &node.children {
            self.write_node(child, selected, out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Action, Node};
    use super::*;

    #[test]
    fn test_serializes_controls() {
        let mut doc = Document::new();
        let li = doc.append(doc.root(), Node::new(Tag::Li).with_class("li-trans"));
        doc.append(
            li,
            Node::input(InputType::Checkbox)
                .with_id("crop")
                .with_attr("name", "topic")
                .with_value("crop")
                .with_checked(true)
                .on_change(Action::CheckChange {
                    qualifier: "crop".into(),
                }),
        );
        let select = doc.append(li, Node::new(Tag::Select).with_id("c_value").with_value("fit"));
        doc.append(select, Node::new(Tag::Option).with_value("fill").with_text("fill"));
        doc.append(select, Node::new(Tag::Option).with_value("fit").with_text("fit"));
        doc.append(li, Node::input(InputType::Number).with_attr("required", ""));

        assert_eq!(
            doc.to_html(),
            concat!(
                r#"<li class="li-trans">"#,
                r#"<input type="checkbox" id="crop" name="topic" value="crop" checked data-change="check:crop">"#,
                r#"<select id="c_value"><option value="fill">fill</option><option value="fit" selected>fit</option></select>"#,
                r#"<input type="number" required>"#,
                "</li>"
            )
        );
    }

    #[test]
    fn test_escapes_text() {
        let mut doc = Document::new();
        let p = doc.append(doc.root(), Node::new(Tag::P).with_text("a <b> & \"c\""));
        assert_eq!(doc.html_of(p), "<p>a &lt;b&gt; &amp; &quot;c&quot;</p>");
    }

    #[test]
    fn test_escapes_attributes_and_keeps_empty_option_value() {
        let mut doc = Document::new();
        let select = doc.append(doc.root(), Node::new(Tag::Select).with_attr("title", "it's <x>"));
        doc.append(select, Node::new(Tag::Option));
        assert_eq!(
            doc.html_of(select),
            r#"<select title="it&#39;s &lt;x&gt;"><option value="" selected></option></select>"#
        );
    }
}
