//! Renderers for positioned layouts.

pub mod svg;
