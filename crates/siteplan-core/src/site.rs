//! The site information-architecture model produced by the parser.
//!
//! A [`Diagram`] is a forest of [`SiteNode`]s. Nodes own their children
//! exclusively; the only non-tree structure is [`Link`]s, which may point
//! at any node by name (or at an external URL) and so may form cycles.

/// A navigation edge originating at a site node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// Navigation to another node in the diagram, identified by name.
    Internal { target: String },
    /// Navigation to a URL outside the diagram. External links never
    /// resolve against the tree.
    External { url: String },
}

impl Link {
    /// Returns the internal target name, or `None` for external links.
    pub fn target(&self) -> Option<&str> {
        match self {
            Link::Internal { target } => Some(target),
            Link::External { .. } => None,
        }
    }
}

/// A page or grouping section in the site tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteNode {
    /// Identifier, unique within the diagram for link resolution.
    pub name: String,
    /// Optional URL-like route. A `:` segment marks a dynamic route.
    pub path: Option<String>,
    /// Optional free-text note.
    pub annotation: Option<String>,
    /// True iff `path` contains a dynamic (`:`) segment.
    pub is_page_stack: bool,
    /// Nested site nodes, exclusively owned by this node.
    pub children: Vec<SiteNode>,
    /// Navigation targets originating at this node.
    pub links: Vec<Link>,
    /// Embedded-UI-element labels attached to this node.
    pub components: Vec<String>,
}

impl SiteNode {
    /// Creates a leaf node from declaration-line fields. `is_page_stack`
    /// is derived from the path.
    pub fn new(name: String, path: Option<String>, annotation: Option<String>) -> Self {
        let is_page_stack = path.as_deref().is_some_and(|p| p.contains(':'));
        Self {
            name,
            path,
            annotation,
            is_page_stack,
            children: Vec::new(),
            links: Vec::new(),
            components: Vec::new(),
        }
    }
}

/// Root container for a parsed site diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    /// Display title from the `site` declaration line.
    pub site_name: String,
    /// Top-level site nodes in source order.
    pub nodes: Vec<SiteNode>,
}
