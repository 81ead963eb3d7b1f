//! Color tables for rendered diagrams.
//!
//! A [`Theme`] is a passive table of named color values consumed by the
//! renderer. The renderer never computes or defaults a color itself; it
//! looks every stroke and fill up from one of these slots.

use serde::Deserialize;

/// Named color slots for every element the renderer draws.
///
/// Colors are stored as SVG color strings (`#rgb`, `#rrggbb`, or named
/// colors); no parsing or validation happens here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Fill of the primary page rectangle.
    pub node_fill: String,
    /// Stroke of the primary page rectangle.
    pub node_stroke: String,
    /// Fill of the back ghost rectangle of a page stack.
    pub stack_back_fill: String,
    /// Fill of the middle ghost rectangle of a page stack.
    pub stack_mid_fill: String,
    /// Fill of a section bounding region.
    pub section_fill: String,
    /// Stroke of a section bounding region.
    pub section_stroke: String,
    /// Color of node name text.
    pub name_text: String,
    /// Color of route path text.
    pub path_text: String,
    /// Color of annotation text.
    pub annotation_text: String,
    /// Color of embedded component labels.
    pub component_text: String,
    /// Stroke of navigation edges and their arrowheads.
    pub edge_stroke: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            node_fill: "#fff".into(),
            node_stroke: "#333".into(),
            stack_back_fill: "#f5f5f5".into(),
            stack_mid_fill: "#fafafa".into(),
            section_fill: "#fafafa".into(),
            section_stroke: "#aaa".into(),
            name_text: "#333".into(),
            path_text: "#666".into(),
            annotation_text: "#999".into(),
            component_text: "#888".into(),
            edge_stroke: "#666".into(),
        }
    }
}

impl Theme {
    /// The built-in dark color table.
    pub fn dark() -> Self {
        Self {
            node_fill: "#1e1e2e".into(),
            node_stroke: "#cdd6f4".into(),
            stack_back_fill: "#11111b".into(),
            stack_mid_fill: "#181825".into(),
            section_fill: "#181825".into(),
            section_stroke: "#585b70".into(),
            name_text: "#cdd6f4".into(),
            path_text: "#a6adc8".into(),
            annotation_text: "#7f849c".into(),
            component_text: "#9399b2".into(),
            edge_stroke: "#a6adc8".into(),
        }
    }

    /// Looks up a built-in theme by name (`"default"` or `"dark"`).
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }
}
