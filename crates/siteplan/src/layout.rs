//! Layout engine turning a site tree into positioned boxes and edges.
//!
//! Sizing is metrics-free: text extents come from a fixed per-character
//! width so layout stays deterministic and needs no font machinery. A
//! leaf node's box wraps its text lines; a node with children becomes a
//! section box that wraps the recursively laid out children, padded on
//! every side. Children sit one level below their parent's own content
//! area; siblings flow left to right.
//!
//! Navigation edges are resolved after placement: internal links run
//! from the source box's bottom center to the target box's top center,
//! external links drop straight down and keep their URL for labeling.

pub(crate) mod order;

use log::debug;

use siteplan_core::{
    Diagram, Link, SiteNode,
    geometry::{Bounds, Point, Size},
};

pub(crate) const CHAR_WIDTH: f32 = 8.0;
pub(crate) const NODE_PADDING_X: f32 = 20.0;
pub(crate) const NODE_PADDING_Y: f32 = 10.0;
pub(crate) const LINE_HEIGHT: f32 = 16.0;
pub(crate) const SIBLING_GAP: f32 = 30.0;
pub(crate) const LEVEL_GAP: f32 = 60.0;
pub(crate) const SECTION_PADDING: f32 = 20.0;

/// A positioned site node.
///
/// Leaf nodes are sized to their text content; nodes with children are
/// sections whose box encloses every child box.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub name: String,
    pub path: Option<String>,
    pub annotation: Option<String>,
    pub is_page_stack: bool,
    pub components: Vec<String>,
    pub origin: Point,
    pub size: Size,
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    /// The bounding box of this node alone (children are inside it for
    /// sections by construction).
    pub fn bounds(&self) -> Bounds {
        Bounds::from_origin_size(self.origin, self.size)
    }

    /// Anchor for outgoing edges.
    pub fn bottom_center(&self) -> Point {
        Point::new(
            self.origin.x() + self.size.width() / 2.0,
            self.origin.y() + self.size.height(),
        )
    }

    /// Anchor for incoming edges.
    pub fn top_center(&self) -> Point {
        Point::new(self.origin.x() + self.size.width() / 2.0, self.origin.y())
    }
}

/// A resolved navigation edge between anchors in diagram space.
#[derive(Debug, Clone)]
pub struct LayoutEdge {
    pub from_node: String,
    pub to_node: String,
    pub from: Point,
    pub to: Point,
    /// Set for external links; rendered as a label at the arrow tip.
    pub url: Option<String>,
}

/// A fully positioned diagram with its tight canvas extent.
#[derive(Debug, Clone)]
pub struct Layout {
    pub site_name: String,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub size: Size,
}

fn text_width(text: &str) -> f32 {
    text.chars().count() as f32 * CHAR_WIDTH
}

/// Width of a node's own box: the widest text line plus padding.
fn content_width(node: &SiteNode) -> f32 {
    let mut max_width = text_width(&node.name);
    if let Some(path) = &node.path {
        max_width = max_width.max(text_width(path));
    }
    if let Some(annotation) = &node.annotation {
        max_width = max_width.max(text_width(annotation));
    }
    for component in &node.components {
        max_width = max_width.max(text_width(&format!("[{component}]")));
    }
    max_width + NODE_PADDING_X * 2.0
}

/// Height of a node's own box: one line per text field plus padding.
fn content_height(node: &SiteNode) -> f32 {
    let mut lines = 1; // name
    if node.path.is_some() {
        lines += 1;
    }
    if node.annotation.is_some() {
        lines += 1;
    }
    lines += node.components.len();
    lines as f32 * LINE_HEIGHT + NODE_PADDING_Y * 2.0
}

/// Place a subtree with its top-left corner at `(x, y)`.
fn layout_subtree(node: &SiteNode, x: f32, y: f32) -> LayoutNode {
    let self_width = content_width(node);
    let self_height = content_height(node);

    let mut placed = LayoutNode {
        name: node.name.clone(),
        path: node.path.clone(),
        annotation: node.annotation.clone(),
        is_page_stack: node.is_page_stack,
        components: node.components.clone(),
        origin: Point::new(x, y),
        size: Size::new(self_width, self_height),
        children: Vec::new(),
    };

    if node.children.is_empty() {
        return placed;
    }

    // Children first; the section box wraps whatever they occupy.
    let child_y = y + self_height + LEVEL_GAP;
    let mut child_x = x + SECTION_PADDING;

    for (i, child) in node.children.iter().enumerate() {
        if i > 0 {
            child_x += SIBLING_GAP;
        }
        let placed_child = layout_subtree(child, child_x, child_y);
        child_x = placed_child.origin.x() + placed_child.size.width();
        placed.children.push(placed_child);
    }

    let children_right = placed
        .children
        .iter()
        .map(|c| c.bounds().max_x())
        .fold(f32::MIN, f32::max);
    let children_bottom = placed
        .children
        .iter()
        .map(|c| c.bounds().max_y())
        .fold(f32::MIN, f32::max);

    let section_width = self_width.max(children_right - x + SECTION_PADDING);
    let section_height = children_bottom - y + SECTION_PADDING;
    placed.size = Size::new(section_width, section_height);

    placed
}

/// Find a placed node by name anywhere in the forest.
fn find_node<'a>(nodes: &'a [LayoutNode], name: &str) -> Option<&'a LayoutNode> {
    for node in nodes {
        if node.name == name {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, name) {
            return Some(found);
        }
    }
    None
}

/// Resolve every link in the site tree against the placed forest.
///
/// Internal links whose target is absent (validation disabled) resolve
/// to no edge at all.
fn collect_edges(site_nodes: &[SiteNode], placed: &[LayoutNode], edges: &mut Vec<LayoutEdge>) {
    for site_node in site_nodes {
        if let Some(from) = find_node(placed, &site_node.name) {
            for link in &site_node.links {
                match link {
                    Link::External { url } => {
                        let anchor = from.bottom_center();
                        edges.push(LayoutEdge {
                            from_node: site_node.name.clone(),
                            to_node: url.clone(),
                            from: anchor,
                            to: anchor.translate(0.0, LEVEL_GAP),
                            url: Some(url.clone()),
                        });
                    }
                    Link::Internal { target } => {
                        let Some(to) = find_node(placed, target) else {
                            debug!(from = site_node.name.as_str(), target = target.as_str();
                                "Skipping edge to unplaced target");
                            continue;
                        };
                        edges.push(LayoutEdge {
                            from_node: site_node.name.clone(),
                            to_node: target.clone(),
                            from: from.bottom_center(),
                            to: to.top_center(),
                            url: None,
                        });
                    }
                }
            }
        }
        collect_edges(&site_node.children, placed, edges);
    }
}

fn max_node_bottom(nodes: &[LayoutNode]) -> f32 {
    nodes
        .iter()
        .map(|n| n.bounds().max_y().max(max_node_bottom(&n.children)))
        .fold(0.0, f32::max)
}

/// Compute the full layout for a diagram.
///
/// With `reorder_top_level`, top-level subtrees are reordered by the
/// crossing-reduction heuristic in [`order`] before placement; edge
/// resolution always walks the site tree in source order.
pub fn layout(diagram: &Diagram, reorder_top_level: bool) -> Layout {
    let ordered: Vec<&SiteNode> = if reorder_top_level {
        order::reorder_to_reduce_crossings(&diagram.nodes)
    } else {
        diagram.nodes.iter().collect()
    };

    let mut nodes = Vec::with_capacity(ordered.len());
    let mut x = 0.0;
    for (i, site_node) in ordered.into_iter().enumerate() {
        if i > 0 {
            x += SIBLING_GAP;
        }
        let placed = layout_subtree(site_node, x, 0.0);
        x = placed.origin.x() + placed.size.width();
        nodes.push(placed);
    }

    let mut edges = Vec::new();
    collect_edges(&diagram.nodes, &nodes, &mut edges);

    let width = nodes
        .iter()
        .map(|n| n.bounds().max_x())
        .fold(0.0, f32::max);
    let node_bottom = max_node_bottom(&nodes);
    let edge_bottom = edges
        .iter()
        .map(|e| e.to.y() + if e.url.is_some() { LINE_HEIGHT } else { 0.0 })
        .fold(0.0, f32::max);

    Layout {
        site_name: diagram.site_name.clone(),
        nodes,
        edges,
        size: Size::new(width, node_bottom.max(edge_bottom)),
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn leaf(name: &str) -> SiteNode {
        SiteNode::new(name.into(), None, None)
    }

    fn diagram(nodes: Vec<SiteNode>) -> Diagram {
        Diagram {
            site_name: "Test".into(),
            nodes,
        }
    }

    #[test]
    fn test_empty_diagram_has_zero_extent() {
        let result = layout(&diagram(vec![]), true);
        assert!(result.nodes.is_empty());
        assert!(result.edges.is_empty());
        assert_approx_eq!(f32, result.size.width(), 0.0);
        assert_approx_eq!(f32, result.size.height(), 0.0);
    }

    #[test]
    fn test_leaf_sizing() {
        // "home" = 4 chars * 8 + 2 * 20 padding
        let result = layout(&diagram(vec![leaf("home")]), true);
        let node = &result.nodes[0];
        assert_approx_eq!(f32, node.size.width(), 72.0);
        // name line only
        assert_approx_eq!(f32, node.size.height(), 36.0);
    }

    #[test]
    fn test_widest_line_wins() {
        let mut node = SiteNode::new("a".into(), Some("/a".into()), None);
        node.components.push("hero banner".into());

        let result = layout(&diagram(vec![node]), true);
        // "[hero banner]" = 13 chars
        assert_approx_eq!(f32, result.nodes[0].size.width(), 13.0 * 8.0 + 40.0);
        // name + path + one component
        assert_approx_eq!(f32, result.nodes[0].size.height(), 3.0 * 16.0 + 20.0);
    }

    #[test]
    fn test_siblings_flow_left_to_right() {
        let result = layout(&diagram(vec![leaf("aa"), leaf("bb"), leaf("cc")]), false);
        let xs: Vec<f32> = result.nodes.iter().map(|n| n.origin.x()).collect();
        let w = 2.0 * 8.0 + 40.0;
        assert_approx_eq!(f32, xs[0], 0.0);
        assert_approx_eq!(f32, xs[1], w + SIBLING_GAP);
        assert_approx_eq!(f32, xs[2], 2.0 * (w + SIBLING_GAP));
    }

    #[test]
    fn test_children_contained_in_section() {
        let mut parent = leaf("shop");
        parent.children = vec![leaf("cart"), leaf("checkout-flow")];

        let result = layout(&diagram(vec![parent]), true);
        let section = &result.nodes[0];
        assert_eq!(section.children.len(), 2);
        for child in &section.children {
            assert!(section.bounds().contains(child.bounds()));
        }
    }

    #[test]
    fn test_children_start_one_level_below_parent_content() {
        let mut parent = leaf("shop");
        parent.children = vec![leaf("cart")];

        let result = layout(&diagram(vec![parent]), true);
        let section = &result.nodes[0];
        let child = &section.children[0];
        // parent content height is 36 (name line only)
        assert_approx_eq!(f32, child.origin.y(), 36.0 + LEVEL_GAP);
        assert_approx_eq!(f32, child.origin.x(), SECTION_PADDING);
    }

    #[test]
    fn test_internal_edge_anchors() {
        let mut a = leaf("aa");
        a.links.push(Link::Internal { target: "bb".into() });

        let result = layout(&diagram(vec![a, leaf("bb")]), false);
        assert_eq!(result.edges.len(), 1);
        let edge = &result.edges[0];
        let from = &result.nodes[0];
        let to = &result.nodes[1];
        assert_approx_eq!(f32, edge.from.x(), from.origin.x() + from.size.width() / 2.0);
        assert_approx_eq!(f32, edge.from.y(), from.size.height());
        assert_approx_eq!(f32, edge.to.x(), to.origin.x() + to.size.width() / 2.0);
        assert_approx_eq!(f32, edge.to.y(), 0.0);
    }

    #[test]
    fn test_external_edge_drops_down_and_extends_canvas() {
        let mut a = leaf("aa");
        a.links.push(Link::External {
            url: "https://x.dev".into(),
        });

        let result = layout(&diagram(vec![a]), true);
        let edge = &result.edges[0];
        assert_eq!(edge.url.as_deref(), Some("https://x.dev"));
        assert_approx_eq!(f32, edge.from.x(), edge.to.x());
        assert_approx_eq!(f32, edge.to.y(), edge.from.y() + LEVEL_GAP);
        // canvas includes the URL label line below the arrow tip
        assert_approx_eq!(f32, result.size.height(), edge.to.y() + LINE_HEIGHT);
    }

    #[test]
    fn test_unresolved_link_produces_no_edge() {
        let mut a = leaf("aa");
        a.links.push(Link::Internal {
            target: "ghost".into(),
        });

        let result = layout(&diagram(vec![a]), true);
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_canvas_is_tight_union_of_extents() {
        let mut parent = leaf("p");
        parent.children = vec![leaf("deep-child-name")];

        let result = layout(&diagram(vec![parent, leaf("q")]), false);
        let expected_width = result
            .nodes
            .iter()
            .map(|n| n.bounds().max_x())
            .fold(0.0, f32::max);
        assert_approx_eq!(f32, result.size.width(), expected_width);

        let section = &result.nodes[0];
        assert_approx_eq!(f32, result.size.height(), section.bounds().max_y());
    }

    #[test]
    fn test_edge_resolution_finds_nested_targets() {
        let mut inner = leaf("inner");
        inner.links.push(Link::Internal { target: "other".into() });
        let mut parent = leaf("outer");
        parent.children = vec![inner];

        let result = layout(&diagram(vec![parent, leaf("other")]), false);
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].from_node, "inner");
        assert_eq!(result.edges[0].to_node, "other");
    }
}
