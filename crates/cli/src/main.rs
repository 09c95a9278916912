mod render;
mod svg;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use shelf_labels_core::catalogue::{CatalogueRecord, load_catalogue_from_str};
use shelf_labels_core::layout::{DesignConfig, PageLayout, PageSize, StartCell, paginate, plan};
use shelf_labels_core::{Condition, LabelError, Selection, parse_query, select};
use shelf_labels_diagnostics::{self as diag, Diagnostic, Severity, codes};
use shelf_labels_settings::{DEFAULT_SETTINGS_PATH, Settings, load_settings_from_str};

use crate::render::{Format, print_json, render_query_diagnostics};
use crate::svg::SvgSheetRenderer;

/// File name of the record listing written next to the pages.
const LISTING_FILE_NAME: &str = "listing.json";

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "labels",
    version,
    about = "Shelf labels: select catalogue items with a callnumber query and lay their labels out on sticker sheets"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Settings file. When omitted, `config.json` in the working directory
    /// is used if it exists, built-in defaults otherwise.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Report progress notes (records loaded, matched, labels expanded).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse a query and print its conditions.
    Query { query: String },

    /// Print the catalogue records a query selects, in catalogue order.
    Filter {
        query: String,
        #[command(flatten)]
        catalogue: CatalogueArg,
    },

    /// Lay the selected labels out on sheets without writing any files.
    Plan {
        query: String,
        #[command(flatten)]
        catalogue: CatalogueArg,
        #[command(flatten)]
        start: StartArgs,
    },

    /// Render the selected labels as SVG pages plus a JSON listing.
    Print {
        query: String,
        /// Output directory (created if missing).
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        catalogue: CatalogueArg,
        #[command(flatten)]
        start: StartArgs,
    },

    /// Explain a diagnostic ID (e.g. SHL1002).
    Explain { id: String },
}

#[derive(Args, Debug)]
struct CatalogueArg {
    /// Catalogue JSON file. Defaults to `catalogue.path` from the settings.
    #[arg(long)]
    catalogue: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StartArgs {
    /// First sticker to use on the first sheet, counted row by row from 1.
    #[arg(long, conflicts_with_all = ["start_row", "start_col"])]
    start: Option<u32>,
    /// Row of the first sticker to use (1-based, with --start-col).
    #[arg(long, requires = "start_col")]
    start_row: Option<u32>,
    /// Column of the first sticker to use (1-based, with --start-row).
    #[arg(long, requires = "start_row")]
    start_col: Option<u32>,
}

impl StartArgs {
    fn start_cell(&self) -> StartCell {
        match (self.start, self.start_row, self.start_col) {
            (Some(ordinal), _, _) => StartCell::Ordinal(ordinal),
            (None, Some(row), Some(col)) => StartCell::Position { row, col },
            _ => StartCell::default(),
        }
    }
}

/// Options shared by every command.
struct Ctx {
    format: Format,
    config: Option<PathBuf>,
    verbose: bool,
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Ctx {
        format: Format::resolve_or_detect(cli.output.as_deref()),
        config: cli.config,
        verbose: cli.verbose,
    };

    match cli.cmd {
        Cmd::Query { query } => cmd_query(&query, &ctx)?,
        Cmd::Filter { query, catalogue } => cmd_filter(&query, &catalogue, &ctx)?,
        Cmd::Plan {
            query,
            catalogue,
            start,
        } => cmd_plan(&query, &catalogue, &start, &ctx)?,
        Cmd::Print {
            query,
            out,
            catalogue,
            start,
        } => cmd_print(&query, &out, &catalogue, &start, &ctx)?,
        Cmd::Explain { id } => cmd_explain(&id, ctx.format)?,
    }

    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_query(query: &str, ctx: &Ctx) -> Result<()> {
    let parsed = match parse_query(query) {
        Ok(parsed) => parsed,
        Err(e) => return fail(ctx.format, query, &[e.to_diagnostic()]),
    };

    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "ok": true,
            "query": parsed.to_string(),
            "conditions": parsed,
            "diagnostics": [],
        }))?,
        Format::Pretty => {
            for condition in parsed.conditions() {
                println!("{}", describe_condition(condition));
            }
        }
    }
    Ok(())
}

fn cmd_filter(query: &str, catalogue: &CatalogueArg, ctx: &Ctx) -> Result<()> {
    let Loaded {
        records,
        mut notes,
        ..
    } = load_inputs(ctx, catalogue)?;
    let selection = match select(&records, query) {
        Ok(selection) => selection,
        Err(e) => return fail_with(ctx.format, query, notes, &e),
    };
    note_selection(ctx, &mut notes, &records, &selection);

    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "ok": true,
            "query": selection.query.to_string(),
            "records": selection.records,
            "diagnostics": notes,
        }))?,
        Format::Pretty => {
            for record in &selection.records {
                println!("{}", describe_record(record));
            }
            render_query_diagnostics(query, &notes);
        }
    }
    exit_on_errors(&notes);
    Ok(())
}

fn cmd_plan(query: &str, catalogue: &CatalogueArg, start: &StartArgs, ctx: &Ctx) -> Result<()> {
    let Loaded {
        settings,
        records,
        mut notes,
    } = load_inputs(ctx, catalogue)?;
    let (selection, config) = match select_and_configure(&records, query, &settings, start) {
        Ok(found) => found,
        Err(e) => return fail_with(ctx.format, query, notes, &e),
    };
    note_selection(ctx, &mut notes, &records, &selection);

    let page = PageSize::A4;
    notes.extend(template_warning(&settings, &config, page));
    let sheet = plan(&selection.labels, &config, page);

    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "ok": true,
            "query": selection.query.to_string(),
            "start": StartReport::of(&config),
            "summary": sheet.summary,
            "placements": sheet.placements,
            "diagnostics": notes,
        }))?,
        Format::Pretty => {
            println!(
                "{} label(s) on {} page(s), starting at row {}, column {}; {} cell(s) left on the last page",
                sheet.summary.labels_placed,
                sheet.summary.total_pages,
                config.start_row(),
                config.start_col(),
                sheet.summary.left_on_last_page
            );
            for p in &sheet.placements {
                println!(
                    "page {:>3}  row {:>2}  col {:>2}  {}",
                    p.page + 1,
                    p.row + 1,
                    p.col + 1,
                    p.text.as_deref().unwrap_or("")
                );
            }
            render_query_diagnostics(query, &notes);
        }
    }
    exit_on_errors(&notes);
    Ok(())
}

fn cmd_print(
    query: &str,
    out: &Path,
    catalogue: &CatalogueArg,
    start: &StartArgs,
    ctx: &Ctx,
) -> Result<()> {
    let Loaded {
        settings,
        records,
        mut notes,
    } = load_inputs(ctx, catalogue)?;
    let (selection, config) = match select_and_configure(&records, query, &settings, start) {
        Ok(found) => found,
        Err(e) => return fail_with(ctx.format, query, notes, &e),
    };
    note_selection(ctx, &mut notes, &records, &selection);

    let page = PageSize::A4;
    notes.extend(template_warning(&settings, &config, page));

    fs::create_dir_all(out)
        .with_context(|| format!("failed to create output directory '{}'", out.display()))?;
    let mut renderer = SvgSheetRenderer::new(out, page, &settings.design)
        .with_context(|| format!("failed to create staging directory in '{}'", out.display()))?;

    let result = paginate(&selection.labels, &config, page, &mut renderer);
    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            // Removes the staging directory before the process exits.
            drop(renderer);
            notes.push(e.to_diagnostic());
            return fail(ctx.format, query, &notes);
        }
    };

    let listing = serde_json::to_string_pretty(&selection.sorted_records())?;
    renderer
        .stage_file(LISTING_FILE_NAME, &listing)
        .context("failed to write record listing")?;
    let written = renderer
        .persist(out)
        .with_context(|| format!("failed to move output into '{}'", out.display()))?;
    if ctx.verbose {
        notes.push(note(format!(
            "wrote {} file(s) to '{}'",
            written.len(),
            out.display()
        )));
    }

    match ctx.format {
        Format::Json => print_json(&serde_json::json!({
            "ok": true,
            "query": selection.query.to_string(),
            "out": out,
            "files": written,
            "start": StartReport::of(&config),
            "summary": summary,
            "diagnostics": notes,
        }))?,
        Format::Pretty => {
            for path in &written {
                println!("{}", path.display());
            }
            eprintln!(
                "printed {} label(s) on {} page(s), starting at row {}, column {}; {} cell(s) left on the last page",
                summary.labels_placed,
                summary.total_pages,
                config.start_row(),
                config.start_col(),
                summary.left_on_last_page
            );
            render_query_diagnostics(query, &notes);
        }
    }
    exit_on_errors(&notes);
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(&serde_json::json!({
            "id": id,
            "explanation": diag::explain(id),
        }))?,
        Format::Pretty => {
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Inputs ──────────────────────────────────────────────────────────────

struct Loaded {
    settings: Settings,
    records: Vec<CatalogueRecord>,
    notes: Vec<Diagnostic>,
}

fn load_inputs(ctx: &Ctx, catalogue: &CatalogueArg) -> Result<Loaded> {
    let mut notes = Vec::new();
    let settings = load_settings(ctx, &mut notes)?;

    let path = match (&catalogue.catalogue, &settings.catalogue) {
        (Some(path), _) => path.clone(),
        (None, Some(source)) => PathBuf::from(&source.path),
        (None, None) => bail!(
            "no catalogue given: pass --catalogue or set catalogue.path in {DEFAULT_SETTINGS_PATH}"
        ),
    };
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read catalogue '{}'", path.display()))?;
    let records = load_catalogue_from_str(&text)
        .with_context(|| format!("failed to parse catalogue '{}'", path.display()))?;
    if ctx.verbose {
        notes.push(note(format!(
            "loaded {} record(s) from '{}'",
            records.len(),
            path.display()
        )));
    }

    Ok(Loaded {
        settings,
        records,
        notes,
    })
}

fn load_settings(ctx: &Ctx, notes: &mut Vec<Diagnostic>) -> Result<Settings> {
    let path = match &ctx.config {
        Some(path) => path.clone(),
        None => {
            let default = PathBuf::from(DEFAULT_SETTINGS_PATH);
            if !default.exists() {
                if ctx.verbose {
                    notes.push(note(format!(
                        "no {DEFAULT_SETTINGS_PATH} found, using built-in settings"
                    )));
                }
                return Ok(Settings::default());
            }
            default
        }
    };
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read settings '{}'", path.display()))?;
    let settings = load_settings_from_str(&text)
        .with_context(|| format!("invalid settings file '{}'", path.display()))?;
    if ctx.verbose {
        notes.push(note(format!("loaded settings from '{}'", path.display())));
    }
    Ok(settings)
}

fn select_and_configure<'a>(
    records: &'a [CatalogueRecord],
    query: &str,
    settings: &Settings,
    start: &StartArgs,
) -> Result<(Selection<'a>, DesignConfig), LabelError> {
    let selection = select(records, query)?;
    let config =
        DesignConfig::from_grid(&settings.design.grid)?.with_start(start.start_cell())?;
    Ok((selection, config))
}

fn note_selection(
    ctx: &Ctx,
    notes: &mut Vec<Diagnostic>,
    records: &[CatalogueRecord],
    selection: &Selection<'_>,
) {
    if ctx.verbose {
        notes.push(note(format!(
            "{} of {} record(s) matched '{}'",
            selection.records.len(),
            records.len(),
            selection.query
        )));
        notes.push(note(format!(
            "{} label(s) after expanding quantities",
            selection.labels.len()
        )));
    }
    notes.extend(selection.diagnostics.iter().cloned());
}

fn template_warning(settings: &Settings, config: &DesignConfig, page: PageSize) -> Option<Diagnostic> {
    let template = settings.design.template.as_ref()?;
    PageLayout::new(config, page).check_template_ratio(template.width, template.height)
}

// ── Output helpers ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct StartReport {
    row: u32,
    col: u32,
    ordinal: u32,
}

impl StartReport {
    fn of(config: &DesignConfig) -> Self {
        Self {
            row: config.start_row(),
            col: config.start_col(),
            ordinal: config.start_ordinal(),
        }
    }
}

fn note(message: String) -> Diagnostic {
    Diagnostic::info(codes::NOTE, message, None)
}

fn describe_condition(condition: &Condition) -> String {
    match condition {
        Condition::Point(point) => format!(
            "point  {point}  (room {}, down to {})",
            point.room(),
            point.max_level()
        ),
        Condition::Range(range) => format!(
            "range  {range}  (room {}, {} to {})",
            range.room(),
            range.start().max_level(),
            range.end().max_level()
        ),
    }
}

fn describe_record(record: &CatalogueRecord) -> String {
    let mut line = format!("{}\t{}", record.callnumber, record.quantity);
    for field in [&record.title, &record.author, &record.publisher] {
        line.push('\t');
        line.push_str(field.as_deref().unwrap_or(""));
    }
    line.trim_end().to_string()
}

/// Report `diagnostics` and exit with code 1 if any is an error.
fn fail(format: Format, query: &str, diagnostics: &[Diagnostic]) -> Result<()> {
    match format {
        Format::Json => print_json(&serde_json::json!({
            "ok": false,
            "diagnostics": diagnostics,
        }))?,
        Format::Pretty => render_query_diagnostics(query, diagnostics),
    }
    exit_on_errors(diagnostics);
    Ok(())
}

fn fail_with(format: Format, query: &str, mut notes: Vec<Diagnostic>, error: &LabelError) -> Result<()> {
    notes.push(error.to_diagnostic());
    fail(format, query, &notes)
}

/// Exit with code 1 if any diagnostic is an error.
/// Warnings and info do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
    {
        process::exit(1);
    }
}
