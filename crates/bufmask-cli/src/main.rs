use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bufmask_core::{Field, InputFormat, Layout, Record, Report};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glob::glob;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bufmask")]
#[command(version)]
#[command(
    about = "Decoder for fixed-layout binary telemetry payloads.",
    long_about = None,
    after_help = "Examples:\n  bufmask decode payloads.hex --mask pos:latLng,time:unixtime -o report.json\n  bufmask decode payload.bin --layout tracker.json --stdout\n  bufmask hex 1d4b7a57 --mask unixtime --names time"
)]
struct Cli {
    /// Log decode decisions to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode every payload of an input file and generate a JSON report.
    Decode {
        /// Path to a binary payload or a hex-lines file (glob patterns allowed)
        input: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        /// How the input carries payloads (default: guessed from the extension)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any payload was rejected
        #[arg(long)]
        strict: bool,

        /// List rejected payloads after decoding
        #[arg(long)]
        list_rejections: bool,
    },
    /// Decode one inline hex payload and print the record.
    Hex {
        /// Hex-encoded payload (whitespace allowed)
        payload: String,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Print the record as JSON instead of `key: value` lines
        #[arg(long)]
        json: bool,
    },
    /// List the available field decoders and their widths.
    Fields,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Compact mask, e.g. `latLng,unixtime` or `pos:latLng,time:unixtime`
    #[arg(
        short,
        long,
        required_unless_present = "layout_file",
        conflicts_with = "layout_file"
    )]
    mask: Option<String>,

    /// JSON layout file
    #[arg(long = "layout", id = "layout_file")]
    layout_file: Option<PathBuf>,

    /// Comma-separated record keys, one per mask field
    #[arg(long, value_delimiter = ',')]
    names: Option<Vec<String>>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Binary,
    HexLines,
}

impl From<FormatArg> for InputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Binary => InputFormat::Binary,
            FormatArg::HexLines => InputFormat::HexLines,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            input,
            layout,
            format,
            report,
            stdout,
            pretty,
            compact,
            quiet,
            strict,
            list_rejections,
        } => cmd_decode(DecodeOptions {
            input,
            layout,
            format,
            report,
            stdout,
            pretty,
            compact,
            quiet,
            strict,
            list_rejections,
        }),
        Commands::Hex {
            payload,
            layout,
            json,
        } => cmd_hex(&payload, layout, json),
        Commands::Fields => {
            cmd_fields();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

struct DecodeOptions {
    input: PathBuf,
    layout: LayoutArgs,
    format: Option<FormatArg>,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_rejections: bool,
}

fn cmd_decode(opts: DecodeOptions) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&opts.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let layout = resolve_layout(opts.layout)?;
    let report = if opts.stdout {
        None
    } else {
        Some(opts.report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report.as_ref() {
        // A report that does not exist yet cannot be the input file.
        if fs::canonicalize(report_path).is_ok_and(|path| path == input_abs) {
            return Err(CliError::new(
                format!(
                    "report path must differ from input: {}",
                    report_path.display()
                ),
                Some("choose a different output path".to_string()),
            ));
        }
    }

    let format = opts
        .format
        .map(InputFormat::from)
        .unwrap_or_else(|| InputFormat::from_path(&resolved_input));
    debug!(input = %resolved_input.display(), ?format, %layout, "decoding input");

    let rep = bufmask_core::decode_file(&resolved_input, format, &layout)
        .context("payload decoding failed")?;
    let json = serialize_json(&rep, opts.pretty, opts.compact)?;

    match report {
        None => print!("{}", json),
        Some(report) => {
            if let Some(parent) = report.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report, json)
                .with_context(|| format!("Failed to write report: {}", report.display()))?;
            if !opts.quiet {
                eprintln!(
                    "OK: {} records, {} rejected -> {}",
                    rep.summary.records_total,
                    rep.summary.rejected_total,
                    report.display()
                );
            }
        }
    }

    if opts.list_rejections && !opts.quiet {
        print_rejections(&rep);
    }
    if opts.strict && !rep.rejections.is_empty() {
        return Err(CliError::new(
            "payloads rejected",
            Some("use --list-rejections to inspect".to_string()),
        ));
    }
    Ok(())
}

fn cmd_hex(payload: &str, layout: LayoutArgs, json: bool) -> Result<(), CliError> {
    let layout = resolve_layout(layout)?;
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = hex::decode(&compact).map_err(|err| {
        CliError::new(
            format!("invalid hex payload: {}", err),
            Some("pass an even number of hex digits, e.g. 1d4b7a57".to_string()),
        )
    })?;

    let record = layout.decode(&bytes).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some(format!(
                "layout '{}' needs {} bytes, payload has {}",
                layout,
                layout.width(),
                bytes.len()
            )),
        )
    })?;

    if json {
        println!("{}", serialize_json(&record, false, true)?);
    } else {
        print_record(&record);
    }
    Ok(())
}

fn cmd_fields() {
    for field in Field::ALL {
        println!(
            "{:<10} {} bytes  {}",
            field.wire_name(),
            field.byte_width(),
            field.encoding()
        );
    }
}

fn resolve_layout(args: LayoutArgs) -> Result<Layout, CliError> {
    let layout = match (args.mask, args.layout_file) {
        (Some(mask), _) => Layout::parse(&mask).map_err(|err| {
            CliError::new(
                format!("invalid mask '{}': {}", mask, err),
                Some("run `bufmask fields` to list field types".to_string()),
            )
        })?,
        (None, Some(path)) => Layout::load(&path).map_err(|err| {
            CliError::new(
                format!("invalid layout file {}: {}", path.display(), err),
                Some(
                    "expected {\"fields\": [{\"type\": \"unixtime\", \"name\": \"time\"}]}"
                        .to_string(),
                ),
            )
        })?,
        (None, None) => {
            return Err(CliError::new(
                "missing layout",
                Some("use --mask or --layout".to_string()),
            ));
        }
    };

    match args.names {
        Some(names) => layout.with_names(&names).map_err(|err| {
            CliError::new(
                err.to_string(),
                Some("pass exactly one name per mask field".to_string()),
            )
        }),
        None => Ok(layout),
    }
}

fn serialize_json<T: serde::Serialize>(
    value: &T,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_record(record: &Record) {
    for (key, value) in record.iter() {
        println!("{}: {}", key, value);
    }
}

fn print_rejections(rep: &Report) {
    eprintln!("Rejected payloads:");
    for rejection in &rep.rejections {
        match rejection.line {
            Some(line) => eprintln!(
                "  #{} (line {}): {}",
                rejection.index, line, rejection.message
            ),
            None => eprintln!("  #{}: {}", rejection.index, rejection.message),
        }
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a binary payload or a .hex file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a binary payload or a .hex file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches)",
                pattern,
                matches.len()
            ),
            Some("pass a single input file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
