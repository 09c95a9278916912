//! Diagnostic rendering.
//!
//! Pretty mode turns [`Diagnostic`]s into ariadne [`Report`]s on stderr with
//! the query as the annotated source, so query errors point at the `;` part
//! that caused them. JSON mode prints one envelope object per command to
//! stdout instead.

use std::io::{self, IsTerminal};
use std::ops::Range;

use ariadne::{Color, Config, Fmt, IndexType, Label, Report, ReportKind, Source};
use serde::Serialize;
use shelf_labels_diagnostics::{Diagnostic, Severity, Span};

/// Name the query text is shown under in reports.
pub(crate) const QUERY_SOURCE_NAME: &str = "<query>";

/// Output format for command results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or pretty for a terminal and JSON for a pipe.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Info => ReportKind::Advice,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

fn severity_word(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warn => "warning",
        Severity::Info => "note",
        _ => "diagnostic",
    }
}

/// `span` clamped to `query` and widened to whole characters.
fn byte_range(query: &str, span: Span) -> Range<usize> {
    let mut start = span.start.min(query.len());
    while !query.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = span.end.clamp(start, query.len());
    while !query.is_char_boundary(end) {
        end += 1;
    }
    start..end
}

/// 1-based index of the `;` part containing byte `at`, and the part count.
fn part_position(query: &str, at: usize) -> (usize, usize) {
    let index = query.as_bytes()[..at].iter().filter(|&&b| b == b';').count() + 1;
    let total = query.bytes().filter(|&b| b == b';').count() + 1;
    (index, total)
}

/// Label text for a spanned query diagnostic, e.g.
/// ``part 2 of 2 `A1--B2`: end_room=B, start_room=A``.
fn part_label(query: &str, range: Range<usize>, diag: &Diagnostic) -> String {
    let (index, total) = part_position(query, range.start);
    let mut label = if total > 1 {
        format!("part {index} of {total}")
    } else {
        "query".to_string()
    };
    let text = query[range].trim();
    if !text.is_empty() {
        label.push_str(&format!(" `{text}`"));
    }
    match context_note(diag) {
        Some(note) => format!("{label}: {note}"),
        None => format!("{label}: {}", diag.message),
    }
}

fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|ctx| !ctx.is_empty())?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Render diagnostics to stderr, followed by a count line.
///
/// Spanned diagnostics underline their part of `query`. Spans are byte
/// offsets, so ariadne is told to index by byte. Everything else prints as a
/// single line plus notes.
pub(crate) fn render_query_diagnostics(query: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let config = Config::default()
        .with_compact(false)
        .with_index_type(IndexType::Byte);
    let mut cache = (QUERY_SOURCE_NAME, Source::from(query));

    for diag in diagnostics {
        let Some(span) = diag.span else {
            eprintln!(
                "{}[{}]: {}",
                severity_word(&diag.severity).fg(severity_color(&diag.severity)),
                diag.id,
                diag.message
            );
            if let Some(note) = context_note(diag) {
                eprintln!("  = note: {note}");
            }
            if diag.is_error()
                && let Some(explanation) = diag.explain()
            {
                eprintln!("  = help: {explanation}");
            }
            continue;
        };

        let range = byte_range(query, span);
        let mut builder = Report::build(
            report_kind(&diag.severity),
            (QUERY_SOURCE_NAME, range.clone()),
        )
        .with_code(diag.id.as_ref())
        .with_message(&diag.message)
        .with_config(config)
        .with_label(
            Label::new((QUERY_SOURCE_NAME, range.clone()))
                .with_message(part_label(query, range, diag))
                .with_color(severity_color(&diag.severity)),
        );
        if let Some(explanation) = diag.explain() {
            builder = builder.with_help(explanation);
        }
        builder.finish().eprint(&mut cache).ok();
    }

    if let Some(line) = summary_line(diagnostics) {
        let worst = if diagnostics.iter().any(Diagnostic::is_error) {
            Color::Red
        } else {
            Color::Yellow
        };
        eprintln!("{}", line.fg(worst));
    }
}

/// Count line such as `1 error, 2 warnings, 1 note`, or `None` when there
/// is nothing worse than a note.
fn summary_line(diagnostics: &[Diagnostic]) -> Option<String> {
    let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();
    let (errors, warnings, notes) = (
        count(Severity::Error),
        count(Severity::Warn),
        count(Severity::Info),
    );
    if errors + warnings == 0 {
        return None;
    }
    let plural = |n: usize, word: &str| format!("{n} {word}{}", if n == 1 { "" } else { "s" });
    let parts: Vec<String> = [(errors, "error"), (warnings, "warning"), (notes, "note")]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, word)| plural(n, word))
        .collect();
    Some(parts.join(", "))
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
