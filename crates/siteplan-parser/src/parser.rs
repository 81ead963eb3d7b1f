//! Parser turning siteplan source text into a [`Diagram`].
//!
//! Parsing runs in three phases over the line-oriented input:
//!
//! 1. each line's content is parsed by the [`grammar`](crate::grammar)
//!    into a single entry,
//! 2. an indentation stack assembles entries into the site tree (a
//!    node's parent is the nearest preceding node with strictly smaller
//!    indentation),
//! 3. internal link targets are validated against the set of declared
//!    node names, batching every unresolved target into one error.

use indexmap::IndexSet;
use log::debug;
use winnow::Parser as _;
use winnow::stream::LocatingSlice;

use siteplan_core::{Diagram, Link, SiteNode};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    grammar::{self, Entry, EntryDiagnostic},
    span::{LineCol, Span, Spanned},
};

/// Options controlling parser behavior.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Validate that every internal link target names a declared node.
    /// Enabled by default.
    pub check_links: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { check_links: true }
    }
}

/// Parse siteplan source text into a diagram, with link validation.
pub fn parse(source: &str) -> Result<Diagram, ParseError> {
    parse_with_options(source, ParseOptions::default())
}

/// Parse siteplan source text with explicit options.
pub fn parse_with_options(source: &str, options: ParseOptions) -> Result<Diagram, ParseError> {
    let mut builder = TreeBuilder::new();
    let mut site_name: Option<String> = None;

    let mut line_start = 0;
    for line in source.split_inclusive('\n') {
        let content_full = line.strip_suffix('\n').unwrap_or(line);
        let content_full = content_full.strip_suffix('\r').unwrap_or(content_full);

        // Blank lines are permitted anywhere, including before the
        // `site` declaration.
        if content_full.trim().is_empty() {
            line_start += line.len();
            continue;
        }

        let indent = leading_indent(source, line_start, content_full)?;
        let content = &content_full[indent..];
        let content_start = line_start + indent;

        if site_name.is_none() {
            site_name = Some(parse_site_line(source, content, content_start, indent)?);
        } else {
            let entry = parse_body_line(source, content, content_start, indent)?;
            builder.push(indent, entry, content_start);
        }

        line_start += line.len();
    }

    let Some(site_name) = site_name else {
        return Err(Diagnostic::error("expected a `site` declaration")
            .with_code(ErrorCode::E001)
            .with_location(LineCol::new(1, 1))
            .with_help("start the diagram with `site <name>`")
            .into());
    };

    if options.check_links {
        builder.validate_links(source)?;
    }

    Ok(Diagram {
        site_name,
        nodes: builder.into_nodes(),
    })
}

/// Count the leading space indentation of a line, rejecting tabs.
fn leading_indent(source: &str, line_start: usize, content: &str) -> Result<usize, ParseError> {
    let mut indent = 0;
    for c in content.chars() {
        match c {
            ' ' => indent += 1,
            '\t' => {
                let offset = line_start + indent;
                return Err(Diagnostic::error("tab character in indentation")
                    .with_code(ErrorCode::E003)
                    .with_label(Span::new(offset..offset + 1), "tab found here")
                    .with_location(LineCol::of_offset(source, offset))
                    .with_help("indent with spaces only")
                    .into());
            }
            _ => break,
        }
    }
    Ok(indent)
}

/// Parse the first non-blank line, which must be `site <name>`.
fn parse_site_line(
    source: &str,
    content: &str,
    content_start: usize,
    indent: usize,
) -> Result<String, ParseError> {
    if indent > 0 {
        return Err(
            Diagnostic::error("the `site` declaration must not be indented")
                .with_code(ErrorCode::E001)
                .with_label(
                    Span::new(content_start..content_start + first_token_len(content)),
                    "indented line here",
                )
                .with_location(LineCol::of_offset(source, content_start))
                .with_help("start the diagram with `site <name>` at column 1")
                .into(),
        );
    }

    let mut parser = (grammar::site_decl, grammar::end_of_entry).map(|(name, ())| name);
    match parser.parse(LocatingSlice::new(content)) {
        Ok(name) => Ok(name.into_inner()),
        Err(err) => {
            let offset = err.offset();
            let diag = match err.into_inner().context().next() {
                Some(ctx) => grammar_diagnostic(source, ctx, content_start, offset),
                None => Diagnostic::error("expected a `site` declaration")
                    .with_code(ErrorCode::E001)
                    .with_label(
                        Span::new(content_start..content_start + first_token_len(content)),
                        "not a `site` declaration",
                    )
                    .with_location(LineCol::of_offset(source, content_start))
                    .with_help("start the diagram with `site <name>`"),
            };
            Err(diag.into())
        }
    }
}

/// Parse one body line into an entry with source-absolute spans.
fn parse_body_line(
    source: &str,
    content: &str,
    content_start: usize,
    indent: usize,
) -> Result<Entry, ParseError> {
    if indent == 0 {
        return Err(
            Diagnostic::error("entries must be indented beneath the `site` declaration")
                .with_code(ErrorCode::E002)
                .with_label(
                    Span::new(content_start..content_start + first_token_len(content)),
                    "unindented entry here",
                )
                .with_location(LineCol::of_offset(source, content_start))
                .with_help("indent every entry by at least one space")
                .into(),
        );
    }

    let mut parser = (grammar::entry, grammar::end_of_entry).map(|(entry, ())| entry);
    match parser.parse(LocatingSlice::new(content)) {
        Ok(entry) => Ok(shift_entry(entry, content_start)),
        Err(err) => {
            let offset = err.offset();
            let diag = match err.into_inner().context().next() {
                Some(ctx) => grammar_diagnostic(source, ctx, content_start, offset),
                None => {
                    let at = content_start + offset;
                    Diagnostic::error("unrecognized entry")
                        .with_code(ErrorCode::E002)
                        .with_label(
                            Span::new(at..at + first_token_len(&content[offset..])),
                            "cannot parse this as an entry",
                        )
                        .with_location(LineCol::of_offset(source, at))
                        .with_help(
                            "expected a node declaration, `--> <target>`, \
                             `---> <url>`, or `[component]`",
                        )
                }
            };
            Err(diag.into())
        }
    }
}

/// Build a diagnostic from grammar error context, shifting slice-relative
/// offsets to source-absolute ones.
fn grammar_diagnostic(
    source: &str,
    ctx: &EntryDiagnostic,
    content_start: usize,
    error_offset: usize,
) -> Diagnostic {
    let start = content_start + ctx.start;
    let end = (content_start + error_offset).max(start + 1);

    let mut diag = Diagnostic::error(ctx.message)
        .with_code(ctx.code)
        .with_label(Span::new(start..end), ctx.code.description())
        .with_location(LineCol::of_offset(source, start));
    if let Some(help) = ctx.help {
        diag = diag.with_help(help);
    }
    diag
}

/// Byte length of the first whitespace-delimited token, at least 1.
fn first_token_len(content: &str) -> usize {
    content
        .split_whitespace()
        .next()
        .map_or(1, |token| token.len().max(1))
}

fn shift_span(span: Span, base: usize) -> Span {
    Span::new(base + span.start()..base + span.end())
}

fn shift_spanned<T>(spanned: Spanned<T>, base: usize) -> Spanned<T> {
    let span = shift_span(spanned.span(), base);
    Spanned::new(spanned.into_inner(), span)
}

fn shift_entry(entry: Entry, base: usize) -> Entry {
    match entry {
        Entry::Node {
            name,
            path,
            annotation,
        } => Entry::Node {
            name: shift_spanned(name, base),
            path: path.map(|p| shift_spanned(p, base)),
            annotation: annotation.map(|a| shift_spanned(a, base)),
        },
        Entry::InternalLink { target } => Entry::InternalLink {
            target: shift_spanned(target, base),
        },
        Entry::ExternalLink { url } => Entry::ExternalLink {
            url: shift_spanned(url, base),
        },
        Entry::Component { label } => Entry::Component {
            label: shift_spanned(label, base),
        },
    }
}

/// An internal link occurrence, retained for batched validation.
#[derive(Debug)]
struct LinkOrigin {
    owner: String,
    target: Spanned<String>,
}

/// Indentation-stack tree builder.
///
/// Nodes live in an arena with parent indices; children always carry a
/// higher arena index than their parent, which lets [`into_nodes`] fold
/// the arena into owned trees with a single reverse sweep instead of
/// recursion.
///
/// [`into_nodes`]: TreeBuilder::into_nodes
#[derive(Debug, Default)]
struct TreeBuilder {
    arena: Vec<Option<SiteNode>>,
    parent: Vec<Option<usize>>,
    /// Open scopes: `(indent, arena index)`, innermost last. The root
    /// scope is `(0, None)` and is never popped since entries always
    /// have indentation of at least 1.
    stack: Vec<(usize, Option<usize>)>,
    names: IndexSet<String>,
    link_origins: Vec<LinkOrigin>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![(0, None)],
            ..Self::default()
        }
    }

    /// The arena index of the node owning entries at `indent`, popping
    /// closed scopes first.
    fn owner_at(&mut self, indent: usize) -> Option<usize> {
        while let Some(&(top_indent, _)) = self.stack.last() {
            if top_indent >= indent && self.stack.len() > 1 {
                self.stack.pop();
            } else {
                break;
            }
        }
        self.stack.last().and_then(|&(_, idx)| idx)
    }

    fn push(&mut self, indent: usize, entry: Entry, line_offset: usize) {
        let owner = self.owner_at(indent);
        match entry {
            Entry::Node {
                name,
                path,
                annotation,
            } => {
                let node = SiteNode::new(
                    name.inner().clone(),
                    path.map(Spanned::into_inner),
                    annotation.map(Spanned::into_inner),
                );
                self.names.insert(node.name.clone());
                let idx = self.arena.len();
                self.arena.push(Some(node));
                self.parent.push(owner);
                self.stack.push((indent, Some(idx)));
            }
            Entry::InternalLink { target } => match owner {
                Some(idx) => {
                    let node = self.arena[idx].as_mut().unwrap();
                    node.links.push(Link::Internal {
                        target: target.inner().clone(),
                    });
                    self.link_origins.push(LinkOrigin {
                        owner: node.name.clone(),
                        target,
                    });
                }
                None => debug!(offset = line_offset; "ignoring link with no owning node"),
            },
            Entry::ExternalLink { url } => match owner {
                Some(idx) => {
                    let node = self.arena[idx].as_mut().unwrap();
                    node.links.push(Link::External {
                        url: url.into_inner(),
                    });
                }
                None => debug!(offset = line_offset; "ignoring link with no owning node"),
            },
            Entry::Component { label } => match owner {
                Some(idx) => {
                    let node = self.arena[idx].as_mut().unwrap();
                    node.components.push(label.into_inner());
                }
                None => debug!(offset = line_offset; "ignoring component with no owning node"),
            },
        }
    }

    /// Report every internal link whose target names no declared node.
    fn validate_links(&self, source: &str) -> Result<(), ParseError> {
        let mut collector = DiagnosticCollector::new();
        for origin in &self.link_origins {
            if self.names.contains(origin.target.inner()) {
                continue;
            }
            let span = origin.target.span();
            collector.emit(
                Diagnostic::error(format!(
                    "node `{}` links to unknown target `{}`",
                    origin.owner,
                    origin.target.inner()
                ))
                .with_code(ErrorCode::E200)
                .with_label(span, "unknown link target")
                .with_location(LineCol::of_offset(source, span.start()))
                .with_help(format!(
                    "declare a node named `{}` or remove the link",
                    origin.target.inner()
                )),
            );
        }
        collector.finish()
    }

    /// Fold the arena into owned top-level trees in source order.
    fn into_nodes(mut self) -> Vec<SiteNode> {
        let mut roots = Vec::new();
        for idx in (0..self.arena.len()).rev() {
            let mut node = self.arena[idx].take().unwrap();
            // Children were attached in reverse during the sweep.
            node.children.reverse();
            match self.parent[idx] {
                Some(p) => self.arena[p].as_mut().unwrap().children.push(node),
                None => roots.push(node),
            }
        }
        roots.reverse();
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP: &str = "\
site MyApp
  home / (landing page)
    [hero]
    --> products
  products /products
    product-detail /products/:id
  about /about
    ---> https://example.com/company
";

    fn codes(err: &ParseError) -> Vec<ErrorCode> {
        err.diagnostics().iter().filter_map(|d| d.code()).collect()
    }

    #[test]
    fn test_parse_full_diagram() {
        let diagram = parse(SHOP).unwrap();

        assert_eq!(diagram.site_name, "MyApp");
        assert_eq!(diagram.nodes.len(), 3);

        let home = &diagram.nodes[0];
        assert_eq!(home.name, "home");
        assert_eq!(home.path.as_deref(), Some("/"));
        assert_eq!(home.annotation.as_deref(), Some("landing page"));
        assert_eq!(home.components, vec!["hero"]);
        assert_eq!(
            home.links,
            vec![Link::Internal {
                target: "products".into()
            }]
        );

        let products = &diagram.nodes[1];
        assert_eq!(products.children.len(), 1);
        assert!(products.children[0].is_page_stack);

        let about = &diagram.nodes[2];
        assert!(about.children.is_empty());
        assert_eq!(
            about.links,
            vec![Link::External {
                url: "https://example.com/company".into()
            }]
        );
    }

    #[test]
    fn test_external_link_attaches_to_owner_not_child() {
        // An external link is an entry of its indented owner, not a node.
        let diagram = parse("site S\n  a\n    ---> https://x.dev\n").unwrap();
        let a = &diagram.nodes[0];
        assert!(a.children.is_empty());
        assert_eq!(
            a.links,
            vec![Link::External {
                url: "https://x.dev".into()
            }]
        );
    }

    #[test]
    fn test_dedent_returns_to_ancestor_scope() {
        let source = "site S\n  a\n    b\n      c\n  d\n";
        let diagram = parse(source).unwrap();

        assert_eq!(diagram.nodes.len(), 2);
        assert_eq!(diagram.nodes[0].name, "a");
        assert_eq!(diagram.nodes[0].children[0].name, "b");
        assert_eq!(diagram.nodes[0].children[0].children[0].name, "c");
        assert_eq!(diagram.nodes[1].name, "d");
    }

    #[test]
    fn test_sibling_order_is_source_order() {
        let diagram = parse("site S\n  a\n    x\n    y\n    z\n").unwrap();
        let names: Vec<_> = diagram.nodes[0]
            .children
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["x", "y", "z"]);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = parse("").unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E001]);
        assert_eq!(err.diagnostics()[0].location(), Some(LineCol::new(1, 1)));
    }

    #[test]
    fn test_first_line_must_declare_site() {
        let err = parse("not valid dsl\n").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.location(), Some(LineCol::new(1, 1)));
    }

    #[test]
    fn test_unindented_body_entry() {
        let err = parse("site S\nhome /\n").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E002));
        assert_eq!(diag.location(), Some(LineCol::new(2, 1)));
    }

    #[test]
    fn test_tab_indentation_rejected() {
        let err = parse("site S\n\thome\n").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E003));
        assert_eq!(diag.location(), Some(LineCol::new(2, 1)));
    }

    #[test]
    fn test_trailing_characters_report_line_and_column() {
        let err = parse("site S\n  home / oops!\n").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.location(), Some(LineCol::new(2, 10)));
    }

    #[test]
    fn test_unknown_link_target() {
        let err = parse("site S\n  home /\n    --> nowhere\n").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(
            diag.message(),
            "node `home` links to unknown target `nowhere`"
        );
        assert_eq!(diag.location(), Some(LineCol::new(3, 9)));
    }

    #[test]
    fn test_unresolved_links_are_batched() {
        let source = "site S\n  a\n    --> ghost\n  b\n    --> phantom\n    --> a\n";
        let err = parse(source).unwrap_err();
        assert_eq!(codes(&err), [ErrorCode::E200, ErrorCode::E200]);
    }

    #[test]
    fn test_check_links_can_be_disabled() {
        let source = "site S\n  a\n    --> ghost\n";
        let diagram =
            parse_with_options(source, ParseOptions { check_links: false }).unwrap();
        assert_eq!(
            diagram.nodes[0].links,
            vec![Link::Internal {
                target: "ghost".into()
            }]
        );
    }

    #[test]
    fn test_forward_links_resolve() {
        // Targets may be declared after the link.
        let source = "site S\n  a\n    --> b\n  b\n";
        assert!(parse(source).is_ok());
    }

    #[test]
    fn test_root_level_links_and_components_ignored() {
        let source = "site S\n  [orphan]\n  --> nobody\n  a\n";
        let diagram = parse(source).unwrap();
        assert_eq!(diagram.nodes.len(), 1);
        assert_eq!(diagram.nodes[0].name, "a");
        assert!(diagram.nodes[0].components.is_empty());
    }

    #[test]
    fn test_blank_lines_anywhere() {
        let source = "\n\nsite S\n\n  a\n\n    b\n\n";
        let diagram = parse(source).unwrap();
        assert_eq!(diagram.nodes[0].children[0].name, "b");
    }

    #[test]
    fn test_crlf_line_endings() {
        let diagram = parse("site S\r\n  a /\r\n").unwrap();
        assert_eq!(diagram.nodes[0].path.as_deref(), Some("/"));
    }

    #[test]
    fn test_irregular_indentation_steps() {
        // Any strictly larger indent opens a child scope, regardless of
        // step size; equal or smaller indents close scopes.
        let source = "site S\n  a\n        b\n   c\n";
        let diagram = parse(source).unwrap();
        assert_eq!(diagram.nodes.len(), 1);
        assert_eq!(diagram.nodes[0].children.len(), 2);
        assert_eq!(diagram.nodes[0].children[0].name, "b");
        assert_eq!(diagram.nodes[0].children[1].name, "c");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn name_strategy() -> impl Strategy<Value = String> {
            "[a-z][a-z0-9_-]{0,8}"
        }

        /// Reference model: the parent of entry `i` is the nearest
        /// preceding entry with strictly smaller indentation.
        fn reference_parents(indents: &[usize]) -> Vec<Option<usize>> {
            let mut parents = Vec::with_capacity(indents.len());
            for (i, &indent) in indents.iter().enumerate() {
                let parent = (0..i).rev().find(|&j| indents[j] < indent);
                parents.push(parent);
            }
            parents
        }

        /// Flatten the parsed forest into (name, parent name) pairs in
        /// source order (children always follow their parent).
        fn flatten(nodes: &[SiteNode], parent: Option<&str>, out: &mut Vec<(String, Option<String>)>) {
            for node in nodes {
                out.push((node.name.clone(), parent.map(str::to_owned)));
                flatten(&node.children, Some(&node.name), out);
            }
        }

        proptest! {
            #[test]
            fn nearest_smaller_indent_is_parent(
                entries in prop::collection::vec((1usize..=8, name_strategy()), 1..24)
            ) {
                // Disambiguate names so parent identity is observable.
                let entries: Vec<(usize, String)> = entries
                    .into_iter()
                    .enumerate()
                    .map(|(i, (indent, name))| (indent, format!("{name}{i}")))
                    .collect();

                let mut source = String::from("site P\n");
                for (indent, name) in &entries {
                    source.push_str(&" ".repeat(*indent));
                    source.push_str(name);
                    source.push('\n');
                }

                let diagram = parse(&source).unwrap();
                let mut flat = Vec::new();
                flatten(&diagram.nodes, None, &mut flat);
                prop_assert_eq!(flat.len(), entries.len());

                let indents: Vec<usize> = entries.iter().map(|(i, _)| *i).collect();
                let expected = reference_parents(&indents);
                let by_name: std::collections::HashMap<&str, Option<usize>> = entries
                    .iter()
                    .enumerate()
                    .map(|(i, (_, name))| (name.as_str(), expected[i]))
                    .collect();

                for (name, parent) in &flat {
                    let expected_parent =
                        by_name[name.as_str()].map(|j| entries[j].1.clone());
                    prop_assert_eq!(parent.clone(), expected_parent);
                }
            }

            #[test]
            fn page_stack_iff_path_has_colon(
                name in name_strategy(),
                segments in prop::collection::vec("[a-z:][a-z0-9:]{0,5}", 0..4)
            ) {
                let path = format!("/{}", segments.join("/"));
                let source = format!("site P\n  {name} {path}\n");

                let diagram = parse(&source).unwrap();
                let node = &diagram.nodes[0];
                prop_assert_eq!(node.is_page_stack, path.contains(':'));
            }

            #[test]
            fn parse_never_panics(source in "\\PC{0,160}") {
                let _ = parse(&source);
            }
        }
    }
}
