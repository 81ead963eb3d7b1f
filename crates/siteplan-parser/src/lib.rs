//! Parser for the siteplan site-architecture notation.
//!
//! The notation describes a site's information architecture as an
//! indented outline: a `site <name>` declaration followed by node
//! declarations, navigation links, and component labels, nested by
//! indentation.
//!
//! ```text
//! site MyApp
//!   home / (landing page)
//!     [hero]
//!     --> products
//!   products /products
//!     product-detail /products/:id
//! ```
//!
//! [`parse`] turns source text into a [`siteplan_core::Diagram`], or a
//! [`ParseError`](error::ParseError) carrying one diagnostic per syntax
//! error or unresolved link target, each with a byte span and a 1-based
//! line/column position.
//!
//! # Example
//!
//! ```
//! let diagram = siteplan_parser::parse("site Shop\n  home /\n")?;
//! assert_eq!(diagram.site_name, "Shop");
//! assert_eq!(diagram.nodes[0].name, "home");
//! # Ok::<(), siteplan_parser::error::ParseError>(())
//! ```

pub mod error;
mod grammar;
mod parser;
mod span;

pub use parser::{ParseOptions, parse, parse_with_options};
pub use span::{LineCol, Span, Spanned};
