//! Configuration types for siteplan diagram rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out and styled. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining layout and style settings.
//! - [`LayoutConfig`] - Controls layout behavior such as crossing reduction.
//! - [`StyleConfig`] - Selects a color theme and per-slot overrides.
//!
//! # Example
//!
//! ```
//! # use siteplan::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert!(config.style().theme().is_ok());
//! ```

use serde::Deserialize;

use siteplan_core::Theme;

/// Top-level application configuration combining layout and style settings.
///
/// Groups [`LayoutConfig`] and [`StyleConfig`] into a single configuration
/// root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    ///
    /// # Arguments
    ///
    /// * `layout` - Layout behavior settings.
    /// * `style` - Theme selection and color overrides.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the style configuration for mutation.
    pub fn style_mut(&mut self) -> &mut StyleConfig {
        &mut self.style
    }
}

/// Layout behavior configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Reorder top-level subtrees to reduce navigation-edge crossings.
    reorder_top_level: bool,

    /// Reject internal links whose target names no declared node.
    validate_links: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reorder_top_level: true,
            validate_links: true,
        }
    }
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`] with the specified behavior flags.
    pub fn new(reorder_top_level: bool, validate_links: bool) -> Self {
        Self {
            reorder_top_level,
            validate_links,
        }
    }

    /// Whether top-level subtrees are reordered to reduce edge crossings.
    pub fn reorder_top_level(&self) -> bool {
        self.reorder_top_level
    }

    /// Whether internal link targets are validated during parsing.
    pub fn validate_links(&self) -> bool {
        self.validate_links
    }
}

/// Theme selection and per-slot color overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Name of a built-in theme (`"default"` or `"dark"`).
    theme: Option<String>,

    /// Per-slot color overrides applied on top of the selected theme.
    overrides: ThemeOverrides,
}

impl StyleConfig {
    /// Creates a new [`StyleConfig`] from a theme name and overrides.
    pub fn new(theme: Option<String>, overrides: ThemeOverrides) -> Self {
        Self { theme, overrides }
    }

    /// Replaces the selected theme name.
    pub fn select_theme(&mut self, name: impl Into<String>) {
        self.theme = Some(name.into());
    }

    /// Resolves the configured theme: look up the named built-in table,
    /// then apply per-slot overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured theme name is not a built-in
    /// theme.
    pub fn theme(&self) -> Result<Theme, String> {
        let name = self.theme.as_deref().unwrap_or("default");
        let mut theme =
            Theme::named(name).ok_or_else(|| format!("unknown theme `{name}` in config"))?;
        self.overrides.apply(&mut theme);
        Ok(theme)
    }
}

/// Optional replacement colors for individual [`Theme`] slots.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeOverrides {
    pub node_fill: Option<String>,
    pub node_stroke: Option<String>,
    pub stack_back_fill: Option<String>,
    pub stack_mid_fill: Option<String>,
    pub section_fill: Option<String>,
    pub section_stroke: Option<String>,
    pub name_text: Option<String>,
    pub path_text: Option<String>,
    pub annotation_text: Option<String>,
    pub component_text: Option<String>,
    pub edge_stroke: Option<String>,
}

impl ThemeOverrides {
    fn apply(&self, theme: &mut Theme) {
        fn replace(slot: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
        replace(&mut theme.node_fill, &self.node_fill);
        replace(&mut theme.node_stroke, &self.node_stroke);
        replace(&mut theme.stack_back_fill, &self.stack_back_fill);
        replace(&mut theme.stack_mid_fill, &self.stack_mid_fill);
        replace(&mut theme.section_fill, &self.section_fill);
        replace(&mut theme.section_stroke, &self.section_stroke);
        replace(&mut theme.name_text, &self.name_text);
        replace(&mut theme.path_text, &self.path_text);
        replace(&mut theme.annotation_text, &self.annotation_text);
        replace(&mut theme.component_text, &self.component_text);
        replace(&mut theme.edge_stroke, &self.edge_stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_resolves_default_theme() {
        let config = AppConfig::default();
        assert!(config.layout().reorder_top_level());
        assert!(config.layout().validate_links());
        assert_eq!(config.style().theme().unwrap(), Theme::default());
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        let mut style = StyleConfig::default();
        style.select_theme("solarized");
        assert!(style.theme().is_err());
    }

    #[test]
    fn test_overrides_apply_on_top_of_named_theme() {
        let overrides = ThemeOverrides {
            edge_stroke: Some("#ff0000".into()),
            ..ThemeOverrides::default()
        };
        let style = StyleConfig::new(Some("dark".into()), overrides);

        let theme = style.theme().unwrap();
        assert_eq!(theme.edge_stroke, "#ff0000");
        assert_eq!(theme.node_fill, Theme::dark().node_fill);
    }
}
