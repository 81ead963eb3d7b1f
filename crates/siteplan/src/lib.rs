//! Siteplan - site-architecture diagrams from an indented outline notation.
//!
//! Parsing, layout, and rendering for the siteplan notation. An indented
//! outline of pages, navigation links, and components becomes a
//! positioned SVG diagram.

pub mod config;

mod error;
mod export;
mod layout;

pub use siteplan_core::{Diagram, Link, SiteNode, Theme, geometry};

pub use error::SiteplanError;
pub use layout::{Layout, LayoutEdge, LayoutNode};

use log::{debug, info, trace};

use siteplan_parser::ParseOptions;

use config::AppConfig;
use export::svg::SvgRenderer;

/// Builder for parsing and rendering siteplan diagrams.
///
/// This provides an API for processing site outlines through parsing,
/// layout, and rendering stages.
///
/// # Examples
///
/// ```rust
/// use siteplan::{DiagramBuilder, config::AppConfig};
///
/// let source = "site MyApp\n  home /\n";
///
/// // With custom config
/// let config = AppConfig::default();
/// let builder = DiagramBuilder::new(config);
///
/// // Parse source to the site tree
/// let diagram = builder.parse(source)
///     .expect("Failed to parse");
///
/// // Render the site tree to SVG
/// let svg = builder.render_svg(&diagram)
///     .expect("Failed to render");
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout and style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse source text into a site tree.
    ///
    /// Runs the line grammar, the indentation automaton, and (unless
    /// disabled in the layout config) internal link validation.
    ///
    /// # Errors
    ///
    /// Returns `SiteplanError::Parse` carrying one diagnostic per syntax
    /// error or unresolved link target.
    pub fn parse(&self, source: &str) -> Result<Diagram, SiteplanError> {
        info!("Parsing site outline");

        let options = ParseOptions {
            check_links: self.config.layout().validate_links(),
        };

        let diagram = siteplan_parser::parse_with_options(source, options)
            .map_err(|err| SiteplanError::new_parse_error(err, source))?;

        debug!("Site outline parsed successfully");
        trace!(diagram:?; "Parsed diagram");

        Ok(diagram)
    }

    /// Compute the positioned layout for a site tree.
    pub fn layout(&self, diagram: &Diagram) -> Layout {
        layout::layout(diagram, self.config.layout().reorder_top_level())
    }

    /// Render a site tree to an SVG string.
    ///
    /// This runs the layout and rendering pipeline: top-level crossing
    /// reduction, box placement, edge resolution, then SVG generation
    /// against the configured theme.
    ///
    /// # Errors
    ///
    /// Returns `SiteplanError::Config` if the configured theme cannot be
    /// resolved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use siteplan::{DiagramBuilder, config::AppConfig};
    ///
    /// let source = "site MyApp\n  home /\n";
    /// let builder = DiagramBuilder::new(AppConfig::default());
    ///
    /// let diagram = builder.parse(source)
    ///     .expect("Failed to parse");
    ///
    /// let svg = builder.render_svg(&diagram)
    ///     .expect("Failed to render diagram");
    ///
    /// println!("{}", svg);
    /// ```
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, SiteplanError> {
        let layout = self.layout(diagram);
        info!(nodes = layout.nodes.len(), edges = layout.edges.len(); "Layout calculated");

        let theme = self.config.style().theme().map_err(SiteplanError::Config)?;
        let document = SvgRenderer::new(&theme).render(&layout);

        info!("SVG rendered successfully");
        Ok(document.to_string())
    }
}
