//! Line grammar for the siteplan notation.
//!
//! The notation is line-oriented: every line holds at most one entry,
//! and nesting is expressed through indentation rather than delimiters.
//! This module parses the *content* of a single line (the `site`
//! declaration or one body entry) with [`winnow`] combinators over a
//! [`LocatingSlice`]; the indentation automaton that assembles entries
//! into a tree lives in [`parser`](super::parser).
//!
//! Spans produced here are relative to the slice being parsed; the
//! caller shifts them to absolute source offsets.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, opt, preceded, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, take_while},
};

use crate::{
    error::ErrorCode,
    span::{Span, Spanned},
};

/// Rich diagnostic information attached to grammar errors.
///
/// Attached to winnow errors via `.context()` so the caller can surface
/// detailed messages with codes, help text, and precise spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntryDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<EntryDiagnostic>>;

/// One entry parsed from a body line, before tree assembly.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Entry {
    /// `<identifier> [<path>] [(<annotation>)]`
    Node {
        name: Spanned<String>,
        path: Option<Spanned<String>>,
        annotation: Option<Spanned<String>>,
    },
    /// `--> <identifier>`
    InternalLink { target: Spanned<String> },
    /// `---> <url>`
    ExternalLink { url: Spanned<String> },
    /// `[<label>]`
    Component { label: Spanned<String> },
}

/// Zero or more spaces/tabs.
fn ws0(input: &mut Input<'_>) -> IResult<()> {
    take_while(0.., [' ', '\t']).void().parse_next(input)
}

/// Parse an identifier: `[a-zA-Z0-9_-]+`.
///
/// The charset deliberately includes `-`, so a lone `-` is a valid node
/// name while `-->` is not (the `>` stops the match).
fn identifier(input: &mut Input<'_>) -> IResult<Spanned<String>> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    })
    .with_span()
    .map(|(name, range): (&str, _)| Spanned::new(name.to_string(), Span::new(range)))
    .parse_next(input)
}

/// Parse a route path: `/` followed by `[a-zA-Z0-9_/:.-]*`.
fn path(input: &mut Input<'_>) -> IResult<Spanned<String>> {
    (
        '/',
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '/' | ':' | '.' | '-')
        }),
    )
        .take()
        .with_span()
        .map(|(p, range): (&str, _)| Spanned::new(p.to_string(), Span::new(range)))
        .parse_next(input)
}

/// Parse a URL: `http` or `https` scheme followed by non-whitespace.
fn url(input: &mut Input<'_>) -> IResult<Spanned<String>> {
    (
        "http",
        opt('s'),
        "://",
        take_while(1.., |c: char| !c.is_whitespace()),
    )
        .take()
        .with_span()
        .map(|(u, range): (&str, _)| Spanned::new(u.to_string(), Span::new(range)))
        .parse_next(input)
}

/// Parse an external link: `---> <url>`.
///
/// Commits after the arrow; a missing or non-`http` target is an error
/// rather than a fallback to another entry form.
fn external_link(input: &mut Input<'_>) -> IResult<Entry> {
    let start = input.current_token_start();
    literal("--->").parse_next(input)?;
    ws0.parse_next(input)?;

    let url = cut_err(url)
        .context(EntryDiagnostic {
            code: ErrorCode::E004,
            message: "expected URL after `--->`",
            help: Some("external links look like `---> https://example.com`"),
            start,
        })
        .parse_next(input)?;

    Ok(Entry::ExternalLink { url })
}

/// Parse an internal link: `--> <identifier>`.
fn internal_link(input: &mut Input<'_>) -> IResult<Entry> {
    let start = input.current_token_start();
    literal("-->").parse_next(input)?;
    ws0.parse_next(input)?;

    let target = cut_err(identifier)
        .context(EntryDiagnostic {
            code: ErrorCode::E004,
            message: "expected identifier after `-->`",
            help: Some("write `--> <node-name>`"),
            start,
        })
        .parse_next(input)?;

    Ok(Entry::InternalLink { target })
}

/// Parse a component: `[<label>]`. The label is trimmed.
fn component(input: &mut Input<'_>) -> IResult<Entry> {
    let start = input.current_token_start();
    '['.parse_next(input)?;

    let label = cut_err(terminated(take_while(1.., |c: char| c != ']'), ']'))
        .context(EntryDiagnostic {
            code: ErrorCode::E005,
            message: "missing component label or closing `]`",
            help: Some("components look like `[hero banner]`"),
            start,
        })
        .with_span()
        .map(|(label, range): (&str, _)| {
            Spanned::new(label.trim().to_string(), Span::new(range))
        })
        .parse_next(input)?;

    Ok(Entry::Component { label })
}

/// Parse an annotation suffix: `(<text>)`. The text is trimmed.
fn annotation(input: &mut Input<'_>) -> IResult<Spanned<String>> {
    let start = input.current_token_start();
    '('.parse_next(input)?;

    cut_err(terminated(take_while(1.., |c: char| c != ')'), ')'))
        .context(EntryDiagnostic {
            code: ErrorCode::E006,
            message: "missing annotation text or closing `)`",
            help: Some("annotations look like `(requires login)`"),
            start,
        })
        .with_span()
        .map(|(text, range): (&str, _)| Spanned::new(text.trim().to_string(), Span::new(range)))
        .parse_next(input)
}

/// Parse a node declaration: `<identifier> [<path>] [(<annotation>)]`.
fn node(input: &mut Input<'_>) -> IResult<Entry> {
    let name = identifier.parse_next(input)?;
    let path = opt(preceded(ws0, path)).parse_next(input)?;
    let annotation = opt(preceded(ws0, annotation)).parse_next(input)?;

    Ok(Entry::Node {
        name,
        path,
        annotation,
    })
}

/// Parse one body-line entry.
///
/// Alternatives are tried in the order of the grammar: external link,
/// internal link, component, node declaration. The arrow forms cannot
/// shadow each other (`-->` fails on `--->` at the third character), so
/// ordering only matters for error quality.
pub(crate) fn entry(input: &mut Input<'_>) -> IResult<Entry> {
    alt((external_link, internal_link, component, node)).parse_next(input)
}

/// Parse the declaration line: `site <identifier>`.
pub(crate) fn site_decl(input: &mut Input<'_>) -> IResult<Spanned<String>> {
    let start = input.current_token_start();
    literal("site").parse_next(input)?;
    ws0.parse_next(input)?;

    cut_err(identifier)
        .context(EntryDiagnostic {
            code: ErrorCode::E001,
            message: "expected a site name after `site`",
            help: Some("the first line must be `site <name>`"),
            start,
        })
        .parse_next(input)
}

/// Consume trailing whitespace and require end of input, or fail with
/// the span of the leftover characters.
pub(crate) fn end_of_entry(input: &mut Input<'_>) -> IResult<()> {
    ws0.parse_next(input)?;
    if input.eof_offset() == 0 {
        return Ok(());
    }

    let start = input.current_token_start();
    Err(ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        EntryDiagnostic {
            code: ErrorCode::E100,
            message: "unexpected trailing characters after entry",
            help: Some("each line holds a single entry"),
            start,
        },
    )))
}
