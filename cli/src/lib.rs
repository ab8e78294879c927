//! sysfont CLI
//!
//! `sysfont list` prints what the font configuration hands out, filtered and
//! formatted to taste; `sysfont unlisted` goes the other way and shows font
//! files sitting in the font directory that the configuration never yields.
//! Plain and NDJSON output are written while the configuration is walked,
//! so piping into `head` stops the walk early.

use std::collections::HashSet;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use log::{info, LevelFilter, SetLoggerError};
use regex::Regex;

use sysfont_core::discovery::PathDiscovery;
use sysfont_core::output::{write_json_pretty, write_ndjson};
use sysfont_core::query::{parse_tag_list, parse_weight_range, FontQuery};
use sysfont_core::tags::tag_to_string;
use sysfont_core::{FontRecord, LocaleSource, SystemFontIterator, SystemFontsConfig};

/// CLI entrypoint for sysfont.
#[derive(Debug, Parser)]
#[command(name = "sysfont", about = "Inspect the system font configuration")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List installed fonts from the configuration
    List(ListArgs),
    /// Show font files in the font directory that the configuration does not yield
    Unlisted(UnlistedArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Font configuration file [env: SYSFONT_CONFIG] [default: /system/etc/fonts.xml]
    #[arg(long = "config", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Directory font file names are relative to [env: SYSFONT_FONT_DIR] [default: /system/fonts/]
    #[arg(long = "font-dir", value_hint = ValueHint::DirPath)]
    font_dir: Option<PathBuf>,

    /// Node the locale of a font is read from
    #[arg(long = "locale-source", default_value_t = LocaleSourceArg::Family, value_enum)]
    locale_source: LocaleSourceArg,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Require fonts to set these axis tags
    #[arg(short = 'a', long = "axes", value_delimiter = ',', value_hint = ValueHint::Other)]
    axes: Vec<String>,

    /// Only fonts whose family locale is one of these
    #[arg(short = 'l', long = "locale", value_delimiter = ',', value_hint = ValueHint::Other)]
    locales: Vec<String>,

    /// Only italic fonts
    #[arg(long = "italic", action = ArgAction::SetTrue, conflicts_with = "upright")]
    italic: bool,

    /// Only upright fonts
    #[arg(long = "upright", action = ArgAction::SetTrue)]
    upright: bool,

    /// Weight or weight range (e.g. 700 or 300-500)
    #[arg(short = 'w', long = "weight", value_hint = ValueHint::Other)]
    weight: Option<String>,

    /// Regex patterns that must match the font file path
    #[arg(short = 'p', long = "path", value_hint = ValueHint::Other)]
    path_patterns: Vec<String>,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Format output as padded columns
    #[arg(long = "columns", action = ArgAction::SetTrue)]
    columns: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

#[derive(Debug, Args)]
struct UnlistedArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Follow symlinks while walking the font directory
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue)]
    follow_symlinks: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LocaleSourceArg {
    Family,
    Document,
}

impl From<LocaleSourceArg> for LocaleSource {
    fn from(arg: LocaleSourceArg) -> Self {
        match arg {
            LocaleSourceArg::Family => LocaleSource::Family,
            LocaleSourceArg::Document => LocaleSource::DocumentParent,
        }
    }
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("warning: logging disabled: {err}");
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match cli.command {
        Command::List(args) => {
            let use_color = match args.color {
                ColorChoice::Always => true,
                ColorChoice::Never => false,
                ColorChoice::Auto => handle.is_terminal(),
            };
            run_list(&args, &mut handle, use_color)
        }
        Command::Unlisted(args) => run_unlisted(&args, &mut handle),
    }
}

fn init_logging(verbose: u8) -> Result<(), SetLoggerError> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
}

fn build_config(source: &SourceArgs) -> SystemFontsConfig {
    let mut config = SystemFontsConfig::from_env().with_locale_source(source.locale_source.into());
    if let Some(path) = &source.config {
        config = config.with_config_path(path);
    }
    if let Some(dir) = &source.font_dir {
        config = config.with_font_dir(dir);
    }
    info!(
        "reading {} (fonts under {})",
        config.config_path.display(),
        config.font_dir.display()
    );
    config
}

fn build_query(args: &ListArgs) -> Result<FontQuery> {
    let axes = parse_tag_list(&args.axes)?;
    let path_patterns = compile_patterns(&args.path_patterns)?;
    let italic = match (args.italic, args.upright) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };

    let mut query = FontQuery::new()
        .with_axes(axes)
        .with_locales(args.locales.clone())
        .with_path_patterns(path_patterns)
        .with_italic(italic);

    if let Some(raw) = &args.weight {
        query = query.with_weight_range(parse_weight_range(raw)?);
    }

    Ok(query)
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("invalid regex: {p}")))
        .collect()
}

fn run_list(args: &ListArgs, mut w: impl Write, color: bool) -> Result<()> {
    let config = build_config(&args.source);
    let query = build_query(args)?;

    let matches = SystemFontIterator::open_with(&config).filter(|record| query.matches(record));

    let count = if args.ndjson {
        write_ndjson(matches, &mut w)?
    } else if args.json {
        write_json_pretty(matches, &mut w)?
    } else if args.columns {
        let records: Vec<FontRecord> = matches.collect();
        write_columns(&records, &mut w, color)?;
        records.len()
    } else {
        write_plain(matches, &mut w, color)?
    };
    info!("{count} fonts matched");

    Ok(())
}

fn run_unlisted(args: &UnlistedArgs, mut w: impl Write) -> Result<()> {
    let config = build_config(&args.source);
    let listed: HashSet<PathBuf> = SystemFontIterator::open_with(&config)
        .map(|record| record.file_path().to_path_buf())
        .collect();

    let on_disk = PathDiscovery::new([config.font_dir.clone()])
        .follow_symlinks(args.follow_symlinks)
        .discover()
        .with_context(|| format!("scanning {}", config.font_dir.display()))?;

    for path in on_disk.iter().filter(|path| !listed.contains(*path)) {
        writeln!(w, "{}", path.display())?;
    }

    Ok(())
}

fn write_plain(
    records: impl IntoIterator<Item = FontRecord>,
    mut w: impl Write,
    color: bool,
) -> Result<usize> {
    let mut written = 0;
    for record in records {
        let rendered = apply_color(&record.path_with_index(), color, AnsiColor::Cyan);
        writeln!(w, "{rendered}")?;
        written += 1;
    }
    Ok(written)
}

fn write_columns(records: &[FontRecord], mut w: impl Write, color: bool) -> Result<()> {
    let mut rows: Vec<(String, String, String)> = records
        .iter()
        .map(|record| {
            let path = record.path_with_index();
            let style = format!(
                "{:>3} {}",
                record.weight(),
                if record.is_italic() { "italic" } else { "normal" }
            );
            let axes: Vec<String> = record
                .axes()
                .iter()
                .map(|axis| format!("{}={}", tag_to_string(axis.tag), axis.value))
                .collect();
            let extra = format!("{:<10} {}", record.locale().unwrap_or("-"), axes.join(","));

            (path, style, extra)
        })
        .collect();

    let path_width = rows
        .iter()
        .map(|r| r.0.len())
        .max()
        .unwrap_or(0)
        .clamp(0, 120);

    for (path, style, extra) in rows.drain(..) {
        let padded_path = format!("{:<path_width$}", path);
        let rendered_path = apply_color(&padded_path, color, AnsiColor::Cyan);
        let rendered_style = apply_color(&style, color, AnsiColor::Yellow);
        let rendered_extra = apply_color(extra.trim_end(), color, AnsiColor::Green);

        writeln!(w, "{rendered_path}  {rendered_style}  {rendered_extra}")?;
    }

    Ok(())
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Cyan,
    Yellow,
    Green,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Cyan => "36",
        AnsiColor::Yellow => "33",
        AnsiColor::Green => "32",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}
