//! SVG rendering of a positioned layout.
//!
//! Pure and deterministic: the same layout and theme always produce the
//! same document. Every color is looked up from the [`Theme`] table;
//! nothing is computed or defaulted here.

use svg::{
    Document,
    node::element::{Definitions, Group, Marker, Path, Polygon, Rectangle, Text},
};

use siteplan_core::Theme;

use crate::layout::{Layout, LayoutEdge, LayoutNode};

const SVG_PADDING: f32 = 20.0;
const STACK_OFFSET: f32 = 6.0;
const CORNER_RADIUS: f32 = 6.0;
const FONT_SIZE: f32 = 13.0;
const SMALL_FONT_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 16.0;
const NODE_PADDING_Y: f32 = 10.0;
const NODE_PADDING_X: f32 = 12.0;

/// Maximum vertical control-point offset for edge curves.
const MAX_CURVE_OFFSET: f32 = 40.0;

/// Escape the five reserved markup characters.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders a [`Layout`] against a color theme.
pub struct SvgRenderer<'a> {
    theme: &'a Theme,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Render the layout to a complete SVG document.
    ///
    /// The canvas is the layout extent plus fixed padding on every side;
    /// all drawing happens inside one group translated by that padding.
    pub fn render(&self, layout: &Layout) -> Document {
        let width = layout.size.width() + SVG_PADDING * 2.0;
        let height = layout.size.height() + SVG_PADDING * 2.0;

        let mut content =
            Group::new().set("transform", format!("translate({SVG_PADDING}, {SVG_PADDING})"));
        for node in &layout.nodes {
            content = content.add(self.render_node(node));
        }
        for edge in &layout.edges {
            content = content.add(self.render_edge(edge));
        }

        Document::new()
            .set("viewBox", (0.0, 0.0, width, height))
            .set("width", width)
            .set("height", height)
            .add(Definitions::new().add(self.arrowhead_marker()))
            .add(content)
    }

    fn arrowhead_marker(&self) -> Marker {
        Marker::new()
            .set("id", "arrowhead")
            .set("markerWidth", 10)
            .set("markerHeight", 7)
            .set("refX", 10)
            .set("refY", 3.5)
            .set("orient", "auto")
            .add(
                Polygon::new()
                    .set("points", "0 0, 10 3.5, 0 7")
                    .set("fill", self.theme.edge_stroke.as_str()),
            )
    }

    fn rect(&self, x: f32, y: f32, width: f32, height: f32, fill: &str, stroke: &str) -> Rectangle {
        Rectangle::new()
            .set("x", x)
            .set("y", y)
            .set("width", width)
            .set("height", height)
            .set("rx", CORNER_RADIUS)
            .set("fill", fill)
            .set("stroke", stroke)
            .set("stroke-width", 1.5)
    }

    fn text(&self, x: f32, y: f32, size: f32, fill: &str, content: &str) -> Text {
        Text::new(escape_xml(content))
            .set("x", x)
            .set("y", y)
            .set("font-family", "sans-serif")
            .set("font-size", size)
            .set("fill", fill)
    }

    fn render_node(&self, node: &LayoutNode) -> Group {
        if node.children.is_empty() {
            self.render_leaf(node)
        } else {
            self.render_section(node)
        }
    }

    /// A leaf node: optional ghost rectangles for page stacks, the
    /// primary rounded rectangle, then stacked text lines.
    fn render_leaf(&self, node: &LayoutNode) -> Group {
        let mut group = Group::new();
        let x = node.origin.x();
        let y = node.origin.y();
        let width = node.size.width();
        let height = node.size.height();

        if node.is_page_stack {
            group = group.add(self.rect(
                x + STACK_OFFSET * 2.0,
                y + STACK_OFFSET * 2.0,
                width,
                height,
                &self.theme.stack_back_fill,
                &self.theme.node_stroke,
            ));
            group = group.add(self.rect(
                x + STACK_OFFSET,
                y + STACK_OFFSET,
                width,
                height,
                &self.theme.stack_mid_fill,
                &self.theme.node_stroke,
            ));
        }

        group = group.add(self.rect(
            x,
            y,
            width,
            height,
            &self.theme.node_fill,
            &self.theme.node_stroke,
        ));

        let text_x = x + NODE_PADDING_X;
        let mut text_y = y + NODE_PADDING_Y + FONT_SIZE;
        group = group.add(
            self.text(text_x, text_y, FONT_SIZE, &self.theme.name_text, &node.name)
                .set("font-weight", "bold"),
        );

        if let Some(path) = &node.path {
            text_y += LINE_HEIGHT;
            group = group.add(self.text(
                text_x,
                text_y,
                SMALL_FONT_SIZE,
                &self.theme.path_text,
                path,
            ));
        }

        if let Some(annotation) = &node.annotation {
            text_y += LINE_HEIGHT;
            group = group.add(
                self.text(
                    text_x,
                    text_y,
                    SMALL_FONT_SIZE,
                    &self.theme.annotation_text,
                    annotation,
                )
                .set("font-style", "italic"),
            );
        }

        for component in &node.components {
            text_y += LINE_HEIGHT;
            group = group.add(self.text(
                text_x,
                text_y,
                SMALL_FONT_SIZE,
                &self.theme.component_text,
                &format!("[{component}]"),
            ));
        }

        group
    }

    /// A section node: one dashed rectangle around the whole box, the
    /// section's own name/path at its top, then each child inside.
    fn render_section(&self, node: &LayoutNode) -> Group {
        let x = node.origin.x();
        let y = node.origin.y();

        let mut group = Group::new().add(
            self.rect(
                x,
                y,
                node.size.width(),
                node.size.height(),
                &self.theme.section_fill,
                &self.theme.section_stroke,
            )
            .set("stroke-dasharray", "4 2"),
        );

        let text_x = x + NODE_PADDING_X;
        let text_y = y + NODE_PADDING_Y + FONT_SIZE;
        group = group.add(
            self.text(text_x, text_y, FONT_SIZE, &self.theme.name_text, &node.name)
                .set("font-weight", "bold"),
        );
        if let Some(path) = &node.path {
            group = group.add(self.text(
                text_x,
                text_y + LINE_HEIGHT,
                SMALL_FONT_SIZE,
                &self.theme.path_text,
                path,
            ));
        }

        for child in &node.children {
            group = group.add(self.render_node(child));
        }

        group
    }

    /// An edge: a cubic bezier from anchor to anchor with an arrowhead
    /// at the tip. External edges are dashed and labeled with their URL
    /// just past the tip.
    fn render_edge(&self, edge: &LayoutEdge) -> Group {
        let dy = edge.to.y() - edge.from.y();
        let offset = (dy.abs() * 0.5).min(MAX_CURVE_OFFSET);
        let data = format!(
            "M {} {} C {} {}, {} {}, {} {}",
            edge.from.x(),
            edge.from.y(),
            edge.from.x(),
            edge.from.y() + offset,
            edge.to.x(),
            edge.to.y() - offset,
            edge.to.x(),
            edge.to.y(),
        );

        let mut path = Path::new()
            .set("d", data)
            .set("stroke", self.theme.edge_stroke.as_str())
            .set("stroke-width", 1.5)
            .set("fill", "none")
            .set("marker-end", "url(#arrowhead)");
        if edge.url.is_some() {
            path = path.set("stroke-dasharray", "5 3");
        }

        let mut group = Group::new().add(path);
        if let Some(url) = &edge.url {
            group = group.add(
                self.text(
                    edge.to.x(),
                    edge.to.y() + LINE_HEIGHT,
                    SMALL_FONT_SIZE,
                    &self.theme.path_text,
                    url,
                )
                .set("text-anchor", "middle"),
            );
        }
        group
    }
}
