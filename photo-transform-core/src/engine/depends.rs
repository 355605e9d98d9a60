//! 显示依赖：控制项的命令值决定被依赖 detail 的可见性

use std::collections::HashSet;

use super::PhotoTransform;
use crate::document::Tag;
use crate::error::CoreResult;

/// One show/hide relationship.
///
/// The detail `dep_id` of qualifier `dep_qualifier` (rendered for command
/// `dep_value`) is visible only while `aff_qualifier` is checked with command
/// `aff_value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependsLink {
    pub dep_qualifier: String,
    pub dep_value: String,
    pub dep_id: String,
    pub aff_qualifier: String,
    pub aff_value: String,
}

/// Ordered list of depends links, unique per full tuple.
#[derive(Debug, Clone, Default)]
pub struct DependsList {
    links: Vec<DependsLink>,
}

impl DependsList {
    /// Upserts `link`: an identical entry is replaced in place, otherwise appended.
    pub fn set(&mut self, link: DependsLink) {
        match self.links.iter_mut().find(|l| **l == link) {
            Some(existing) => *existing = link,
            None => self.links.push(link),
        }
    }

    /// Links controlled by `aff_qualifier`, optionally filtered by trigger value.
    pub fn get_depends(&self, aff_qualifier: &str, value: Option<&str>) -> Vec<&DependsLink> {
        self.links
            .iter()
            .filter(|l| l.aff_qualifier == aff_qualifier)
            .filter(|l| value.is_none_or(|v| v.is_empty() || l.aff_value == v))
            .collect()
    }

    /// Links whose dependent is `dep_qualifier`, optionally filtered by dependent value.
    pub fn get_affects(&self, dep_qualifier: &str, value: Option<&str>) -> Vec<&DependsLink> {
        self.links
            .iter()
            .filter(|l| l.dep_qualifier == dep_qualifier)
            .filter(|l| value.is_none_or(|v| v.is_empty() || l.dep_value == v))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependsLink> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl PhotoTransform {
    /// Re-evaluates every link in which `qualifier` is the controller or the
    /// dependent, then the dependents of its dependents.
    pub fn toggle_depends(&mut self, qualifier: &str) -> CoreResult<()> {
        self.schema.qualifier(qualifier)?;
        let mut visited = HashSet::new();
        self.toggle_depends_from(qualifier, &mut visited);
        Ok(())
    }

    fn toggle_depends_from(&mut self, qualifier: &str, visited: &mut HashSet<String>) {
        if !visited.insert(qualifier.to_string()) {
            return;
        }
        let links: Vec<DependsLink> = self
            .depends
            .get_depends(qualifier, None)
            .into_iter()
            .chain(self.depends.get_affects(qualifier, None))
            .cloned()
            .collect();

        for link in &links {
            // dep_id may now belong to a control of another command
            let rendered = self.rendered_command(&link.dep_qualifier);
            if rendered.as_deref() != Some(link.dep_value.as_str()) {
                continue;
            }
            let visible = self.link_active(link);
            self.show_dependent(&link.dep_id, visible);
        }

        let next: Vec<String> = links
            .iter()
            .filter(|l| l.aff_qualifier == qualifier && l.dep_qualifier != qualifier)
            .map(|l| l.dep_qualifier.clone())
            .collect();
        for dependent in next {
            self.toggle_depends_from(&dependent, visited);
        }
    }

    /// Both sides checked and showing the linked commands.
    fn link_active(&self, link: &DependsLink) -> bool {
        self.active_value(&link.aff_qualifier).as_deref() == Some(link.aff_value.as_str())
            && self.active_value(&link.dep_qualifier).as_deref() == Some(link.dep_value.as_str())
    }

    /// Command value of a checked qualifier.
    fn active_value(&self, qualifier: &str) -> Option<String> {
        if !self.is_checked(qualifier) {
            return None;
        }
        let ids = self.ids(qualifier).ok()?;
        self.element_value(&ids.value)
    }

    /// Command whose details are currently rendered, checked or not.
    fn rendered_command(&self, qualifier: &str) -> Option<String> {
        let ids = self.ids(qualifier).ok()?;
        self.element_value(&ids.value)
    }

    /// Shows or hides `dep_id` together with a title paragraph right before it.
    fn show_dependent(&mut self, dep_id: &str, visible: bool) {
        let Some(nid) = self.doc.find(dep_id) else {
            // detail box re-rendered for another command
            return;
        };
        self.doc.set_hidden(nid, !visible);
        if let Some(title) = self.doc.previous_sibling(nid)
            && self.doc.get(title).is_some_and(|n| n.tag == Tag::P)
        {
            self.doc.set_hidden(title, !visible);
        }
    }
}
