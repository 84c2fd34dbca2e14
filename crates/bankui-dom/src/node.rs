//! DOM Node
//!
//! Nodes link to each other through `NodeId`s into the tree's arena
//! instead of pointers, so a detached subtree keeps its shape and can be
//! re-attached later.

use crate::{DOMRect, NodeId};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::with_data(NodeData::Text(content.to_string()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lower-cased tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<Attribute>,
    /// Box assigned by layout; `None` means the element generates no box
    pub rect: Option<DOMRect>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            rect: Some(DOMRect::unit()),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute, returning the previous value
    pub fn set_attr(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            return Some(std::mem::replace(&mut attr.value, value.to_string()));
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
        None
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(pos).value)
    }

    /// Parsed `tabindex`, if present and numeric
    pub fn tab_index(&self) -> Option<i32> {
        self.get_attr("tabindex")?.trim().parse().ok()
    }

    /// `hidden` attribute or an inline `display: none`
    pub fn is_display_none(&self) -> bool {
        if self.has_attr("hidden") {
            return true;
        }
        self.get_attr("style").is_some_and(|style| {
            style.split(';').any(|decl| {
                let mut parts = decl.splitn(2, ':');
                let prop = parts.next().unwrap_or("").trim();
                let value = parts.next().unwrap_or("").trim();
                prop.eq_ignore_ascii_case("display") && value.eq_ignore_ascii_case("none")
            })
        })
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_replace() {
        let mut el = ElementData::new("BUTTON");
        assert_eq!(el.tag, "button");
        assert_eq!(el.set_attr("tabindex", "0"), None);
        assert_eq!(el.set_attr("tabindex", "-1"), Some("0".to_string()));
        assert_eq!(el.tab_index(), Some(-1));
        assert_eq!(el.attrs.len(), 1);
    }

    #[test]
    fn test_display_none() {
        let mut el = ElementData::new("div");
        assert!(!el.is_display_none());
        el.set_attr("style", "color: red; display : none");
        assert!(el.is_display_none());
        el.set_attr("style", "display:block");
        assert!(!el.is_display_none());
        el.set_attr("hidden", "");
        assert!(el.is_display_none());
    }

    #[test]
    fn test_bad_tabindex() {
        let mut el = ElementData::new("div");
        el.set_attr("tabindex", "abc");
        assert_eq!(el.tab_index(), None);
    }
}
