//! In-memory preview document: an arena of element and text nodes with an id index.
//!
//! Handles (`NodeId`) stay valid until their subtree is replaced. Freed slots are
//! reused, so wholesale section re-renders on every keystroke do not grow the arena.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::dom::markup::{escape_text, is_void, write_open_tag, Display, Element, Markup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Stale node handle {0:?}")]
    StaleNode(NodeId),

    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("Duplicate element id '{0}'")]
    DuplicateId(String),

    #[error("Required element '{0}' is missing")]
    MissingElement(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: &'static str,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    display: Display,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    ids: HashMap<String, NodeId>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let body = Node {
            children: Vec::new(),
            data: NodeData::Element(ElementData {
                tag: "body",
                id: None,
                classes: Vec::new(),
                attrs: Vec::new(),
                display: Display::Inherit,
            }),
        };
        Self {
            slots: vec![Some(body)],
            free: Vec::new(),
            ids: HashMap::new(),
            body: NodeId(0),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Like [`element_by_id`](Self::element_by_id) but a missing element is an error.
    pub fn require(&self, id: &str) -> Result<NodeId, DocumentError> {
        self.element_by_id(id)
            .ok_or_else(|| DocumentError::MissingElement(id.to_string()))
    }

    /// Elements carrying `class`, in document order.
    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.body];
        while let Some(id) = stack.pop() {
            let Some(node) = self.slot(id) else { continue };
            if let NodeData::Element(el) = &node.data {
                if el.classes.iter().any(|c| c == class) {
                    found.push(id);
                }
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }

    // ────────────────────────────────────────────────────────────────────────
    // Tree mutation
    // ────────────────────────────────────────────────────────────────────────

    /// Appends `markup` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, markup: Markup) -> Result<NodeId, DocumentError> {
        self.element(parent)?;
        self.check_new_ids(std::slice::from_ref(&markup), &HashSet::new())?;
        let child = self.insert(markup);
        self.node_mut(parent)?.children.push(child);
        Ok(child)
    }

    /// Replaces every child of `parent` with `markup`, like assigning `innerHTML`.
    pub fn replace_children(
        &mut self,
        parent: NodeId,
        markup: Vec<Markup>,
    ) -> Result<(), DocumentError> {
        self.element(parent)?;
        let old_children = std::mem::take(&mut self.node_mut(parent)?.children);

        let mut released = HashSet::new();
        for child in &old_children {
            self.subtree_ids(*child, &mut released);
        }
        if let Err(e) = self.check_new_ids(&markup, &released) {
            self.node_mut(parent)?.children = old_children;
            return Err(e);
        }

        for child in old_children {
            self.release(child);
        }
        let new_children: Vec<NodeId> = markup.into_iter().map(|m| self.insert(m)).collect();
        self.node_mut(parent)?.children = new_children;
        Ok(())
    }

    /// Replaces the content of `node` with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DocumentError> {
        self.replace_children(node, vec![Markup::text(text)])
    }

    // ────────────────────────────────────────────────────────────────────────
    // Element state
    // ────────────────────────────────────────────────────────────────────────

    pub fn display(&self, node: NodeId) -> Result<Display, DocumentError> {
        Ok(self.element(node)?.display)
    }

    pub fn set_display(&mut self, node: NodeId, display: Display) -> Result<(), DocumentError> {
        self.element_mut(node)?.display = display;
        Ok(())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> Result<bool, DocumentError> {
        Ok(self.element(node)?.classes.iter().any(|c| c == class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DocumentError> {
        let el = self.element_mut(node)?;
        if !el.classes.iter().any(|c| c == class) {
            el.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DocumentError> {
        self.element_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Result<Option<&str>, DocumentError> {
        Ok(self
            .element(node)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str()))
    }

    // ────────────────────────────────────────────────────────────────────────
    // Reading
    // ────────────────────────────────────────────────────────────────────────

    #[cfg(test)]
    pub fn text_content(&self, node: NodeId) -> Result<String, DocumentError> {
        let mut out = String::new();
        self.collect_text(node, &mut out)?;
        Ok(out)
    }

    /// Serialized markup of `node` including the node itself.
    pub fn outer_html(&self, node: NodeId) -> Result<String, DocumentError> {
        let mut out = String::new();
        self.write_html(node, &mut out)?;
        Ok(out)
    }

    #[cfg(test)]
    fn collect_text(&self, node: NodeId, out: &mut String) -> Result<(), DocumentError> {
        let n = self.node(node)?;
        match &n.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(_) => {
                for child in &n.children {
                    self.collect_text(*child, out)?;
                }
            }
        }
        Ok(())
    }

    fn write_html(&self, node: NodeId, out: &mut String) -> Result<(), DocumentError> {
        let n = self.node(node)?;
        match &n.data {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element(el) => {
                let attrs = el.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()));
                write_open_tag(out, el.tag, el.id.as_deref(), &el.classes, attrs, el.display);
                if is_void(el.tag) {
                    return Ok(());
                }
                for child in &n.children {
                    self.write_html(*child, out)?;
                }
                out.push_str("</");
                out.push_str(el.tag);
                out.push('>');
            }
        }
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Arena internals
    // ────────────────────────────────────────────────────────────────────────

    fn slot(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node(&self, id: NodeId) -> Result<&Node, DocumentError> {
        self.slot(id).ok_or(DocumentError::StaleNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DocumentError> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(DocumentError::StaleNode(id))
    }

    fn element(&self, id: NodeId) -> Result<&ElementData, DocumentError> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(DocumentError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DocumentError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(DocumentError::NotAnElement(id)),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Inserts a markup tree. Callers must have run `check_new_ids` first.
    fn insert(&mut self, markup: Markup) -> NodeId {
        match markup {
            Markup::Text(text) => self.alloc(Node {
                children: Vec::new(),
                data: NodeData::Text(text),
            }),
            Markup::Element(Element {
                tag,
                id,
                classes,
                attrs,
                display,
                children,
            }) => {
                let element_id = id.clone();
                let node_id = self.alloc(Node {
                        children: Vec::new(),
                    data: NodeData::Element(ElementData {
                        tag,
                        id,
                        classes,
                        attrs,
                        display,
                    }),
                });
                if let Some(element_id) = element_id {
                    self.ids.insert(element_id, node_id);
                }
                let child_ids: Vec<NodeId> =
                    children.into_iter().map(|c| self.insert(c)).collect();
                if let Some(Some(node)) = self.slots.get_mut(node_id.0) {
                    node.children = child_ids;
                }
                node_id
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let Some(node) = self.slots.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        if let NodeData::Element(ElementData {
            id: Some(element_id),
            ..
        }) = &node.data
        {
            self.ids.remove(element_id);
        }
        self.free.push(id.0);
        for child in node.children {
            self.release(child);
        }
    }

    fn subtree_ids(&self, id: NodeId, out: &mut HashSet<String>) {
        let Some(node) = self.slot(id) else { return };
        if let NodeData::Element(ElementData {
            id: Some(element_id),
            ..
        }) = &node.data
        {
            out.insert(element_id.clone());
        }
        for child in &node.children {
            self.subtree_ids(*child, out);
        }
    }

    fn check_new_ids(
        &self,
        markup: &[Markup],
        released: &HashSet<String>,
    ) -> Result<(), DocumentError> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&Markup> = markup.iter().collect();
        while let Some(m) = stack.pop() {
            if let Markup::Element(el) = m {
                if let Some(id) = &el.id {
                    let taken = self.ids.contains_key(id) && !released.contains(id);
                    if taken || !seen.insert(id.as_str()) {
                        return Err(DocumentError::DuplicateId(id.clone()));
                    }
                }
                stack.extend(el.children.iter());
            }
        }
        Ok(())
    }
}
