//! Core types and definitions for siteplan diagrams.
//!
//! This crate holds the leaf types shared by the parser, layout engine,
//! and renderer: the site model ([`site`]), 2-D geometry ([`geometry`]),
//! and the color table consumed by the renderer ([`theme`]).

pub mod geometry;
pub mod site;
pub mod theme;

pub use site::{Diagram, Link, SiteNode};
pub use theme::Theme;
