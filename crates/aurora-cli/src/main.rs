use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use aurora_core::config::{
    ADVERTISING_SERVICE_UUID, DATA_TRANSFER_CHARACTERISTIC_UUID, DATA_TRANSFER_SERVICE_UUID,
    DEFAULT_API_LEVEL, DEFAULT_DISPLAY_NAME, DEFAULT_LED_COUNT,
};
use aurora_core::protocol::{decode_color, encode_color, encode_holds};
use aurora_core::{BoardConfig, ConfigError, DEFAULT_CHUNK_SIZE, Hold, ReplayOptions, Report, Rgb};
use clap::{ArgAction, Args, Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "aurora")]
#[command(version)]
#[command(
    about = "Host-side emulator for Aurora-protocol LED climbing boards.",
    long_about = None,
    after_help = "Examples:\n  aurora replay capture.bin -o report.json\n  aurora encode -o capture.bin 10:ffffff 11:ff0000\n  aurora info --name \"Home Wall\""
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a capture of characteristic writes and write a JSON report.
    #[command(
        after_help = "Examples:\n  aurora replay capture.bin -o report.json\n  aurora replay 'captures/*.bin' --stdout --pretty\n  aurora replay capture.bin --chunk-size 1 --strict -o report.json"
    )]
    Replay(ReplayArgs),
    /// Encode holds into the frames the app would send.
    Encode(EncodeArgs),
    /// Print the board identity the app would see.
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct BoardArgs {
    /// Display name advertised to the app (letters, digits, spaces)
    #[arg(long, default_value = DEFAULT_DISPLAY_NAME)]
    name: String,

    /// Protocol API level advertised after the name
    #[arg(long, default_value_t = DEFAULT_API_LEVEL)]
    api_level: u8,

    /// Number of LEDs on the strip
    #[arg(long, default_value_t = DEFAULT_LED_COUNT)]
    led_count: u16,
}

impl BoardArgs {
    fn to_config(&self) -> BoardConfig {
        BoardConfig {
            display_name: self.name.clone(),
            api_level: self.api_level,
            led_count: self.led_count,
        }
    }
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Path (or glob matching one file) of a raw capture
    input: PathBuf,

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

    /// Bytes per transport write
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    #[command(flatten)]
    board: BoardArgs,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if any frame was rejected
    #[arg(long)]
    strict: bool,

    /// List decoded batches after the replay
    #[arg(long)]
    list_batches: bool,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Output capture path
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Holds as POSITION:RRGGBB (hex color, quantized to the packed palette)
    #[arg(required = true)]
    holds: Vec<String>,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct InfoArgs {
    #[command(flatten)]
    board: BoardArgs,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = match &cli.command {
        Commands::Replay(args) => args.quiet,
        Commands::Encode(args) => args.quiet,
        Commands::Info(_) => false,
    };
    init_logging(cli.verbose, quiet);

    let result = match cli.command {
        Commands::Replay(args) => cmd_replay(args),
        Commands::Encode(args) => cmd_encode(args),
        Commands::Info(args) => cmd_info(args),
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

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn hinted(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    fn board(err: ConfigError) -> Self {
        Self::hinted(
            format!("invalid board configuration: {}", err),
            "names use letters, digits and spaces; --api-level is 1 to 9; --led-count is at least 1",
        )
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            message: format!("{:#}", err),
            hint: None,
        }
    }
}

fn cmd_replay(args: ReplayArgs) -> Result<(), CliError> {
    let capture = resolve_capture(&args.input)?;
    let capture_abs = fs::canonicalize(&capture)
        .with_context(|| format!("cannot resolve capture path {}", capture.display()))?;

    let report_path = if args.stdout {
        None
    } else {
        let path = args.report.ok_or_else(|| {
            CliError::hinted("no report destination", "pass -o <report.json> or --stdout")
        })?;
        refuse_overwriting_capture(&path, &capture_abs)?;
        Some(path)
    };

    let board = args.board.to_config();
    board.validate().map_err(CliError::board)?;
    if args.chunk_size == 0 {
        return Err(CliError::hinted(
            "chunk size must be at least 1",
            format!(
                "a characteristic write carries at least one byte; the app writes {} at a time",
                DEFAULT_CHUNK_SIZE
            ),
        ));
    }
    let options = ReplayOptions {
        chunk_size: args.chunk_size,
        board,
    };

    let rep = aurora_core::replay_file(&capture, &options)
        .with_context(|| format!("replay of {} failed", capture.display()))?;
    let json = report_json(&rep, args.pretty && !args.compact)?;

    match report_path {
        None => print!("{}", json),
        Some(path) => {
            create_parent_dir(&path)?;
            fs::write(&path, json)
                .with_context(|| format!("cannot write report {}", path.display()))?;
            if !args.quiet {
                eprintln!("OK: report written -> {}", path.display());
            }
        }
    }

    if args.list_batches && !args.quiet {
        print_batches(&rep);
    }
    if args.strict && rep.has_rejections() {
        return Err(CliError::hinted(
            format!(
                "rejected frames detected ({} checksum, {} ordering)",
                rep.decode.checksum_failures, rep.decode.ordering_violations
            ),
            "rerun with -v to log each rejected frame and the holds it dropped",
        ));
    }
    Ok(())
}

/// Refuse a report path that names the capture being replayed.
fn refuse_overwriting_capture(report_path: &Path, capture_abs: &Path) -> Result<(), CliError> {
    let parent = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A directory that does not exist yet cannot contain the capture.
    let Ok(report_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let Some(file_name) = report_path.file_name() else {
        return Err(CliError::hinted(
            format!("report path has no file name: {}", report_path.display()),
            "pass a file such as report.json",
        ));
    };
    if report_dir.join(file_name) == capture_abs {
        return Err(CliError::hinted(
            format!("report would overwrite the capture {}", report_path.display()),
            "write the report next to the capture, e.g. capture.report.json",
        ));
    }
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<(), CliError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create directory {}", parent.display()))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

fn report_json(rep: &Report, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(rep)
    } else {
        serde_json::to_string(rep)
    };
    Ok(json.context("cannot encode replay report as JSON")?)
}

fn print_batches(rep: &Report) {
    eprintln!("Batches:");
    for batch in &rep.batches {
        eprintln!(
            "  #{} {} holds ({} applied, {} out of range)",
            batch.index,
            batch.holds.len(),
            batch.applied,
            batch.out_of_range
        );
        for hold in &batch.holds {
            eprintln!(
                "    {:>5} #{:02x}{:02x}{:02x}",
                hold.position, hold.red, hold.green, hold.blue
            );
        }
    }
}

fn cmd_encode(args: EncodeArgs) -> Result<(), CliError> {
    let holds = args
        .holds
        .iter()
        .map(|text| parse_hold(text.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let frames = encode_holds(&holds);
    let bytes = frames.concat();
    create_parent_dir(&args.output)?;
    fs::write(&args.output, &bytes)
        .with_context(|| format!("cannot write capture {}", args.output.display()))?;

    if !args.quiet {
        eprintln!(
            "OK: {} holds in {} frames ({} bytes) -> {}",
            holds.len(),
            frames.len(),
            bytes.len(),
            args.output.display()
        );
    }
    Ok(())
}

fn parse_hold(text: &str) -> Result<Hold, CliError> {
    let invalid = |detail: String| {
        CliError::hinted(
            format!("invalid hold '{}': {}", text, detail),
            "holds are POSITION:RRGGBB with a decimal LED index, e.g. 42:ff8000",
        )
    };

    let (position, color) = text
        .split_once(':')
        .ok_or_else(|| invalid("missing ':'".to_string()))?;
    let position: u16 = position
        .trim()
        .parse()
        .map_err(|err| invalid(format!("position: {}", err)))?;

    let color = color.trim().trim_start_matches('#');
    if color.len() != 6 || !color.is_ascii() {
        return Err(invalid("color must have six hex digits".to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&color[range], 16).map_err(|err| invalid(format!("color: {}", err)))
    };
    let requested = Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?);

    let sent = decode_color(encode_color(requested));
    if sent != requested {
        debug!(position, ?requested, ?sent, "color quantized");
    }
    Ok(Hold::new(position, sent))
}

#[derive(Serialize)]
struct BoardInfo {
    advertised_name: String,
    advertising_service: &'static str,
    data_transfer_service: &'static str,
    data_transfer_characteristic: &'static str,
    led_count: u16,
    version: &'static str,
    commit: &'static str,
    build_date: &'static str,
}

fn cmd_info(args: InfoArgs) -> Result<(), CliError> {
    let board = args.board.to_config();
    board.validate().map_err(CliError::board)?;

    let info = BoardInfo {
        advertised_name: board.advertised_name(),
        advertising_service: ADVERTISING_SERVICE_UUID,
        data_transfer_service: DATA_TRANSFER_SERVICE_UUID,
        data_transfer_characteristic: DATA_TRANSFER_CHARACTERISTIC_UUID,
        led_count: board.led_count,
        version: env!("CARGO_PKG_VERSION"),
        commit: env!("AURORA_BUILD_COMMIT"),
        build_date: env!("AURORA_BUILD_DATE"),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&info).context("JSON serialization failed")?;
        println!("{}", json);
        return Ok(());
    }

    println!("advertised name:      {}", info.advertised_name);
    println!("advertising service:  {}", info.advertising_service);
    println!("data service:         {}", info.data_transfer_service);
    println!("data characteristic:  {}", info.data_transfer_characteristic);
    println!("LEDs:                 {}", info.led_count);
    println!(
        "version:              {} ({}, {})",
        info.version, info.commit, info.build_date
    );
    Ok(())
}

/// Turn the replay argument into one capture file; a glob must match exactly one.
fn resolve_capture(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    let capture = if is_glob_pattern(&pattern) {
        single_glob_match(&pattern)?
    } else {
        input.to_path_buf()
    };

    if !capture.exists() {
        return Err(CliError::hinted(
            format!("capture not found: {}", capture.display()),
            "record the data-transfer characteristic writes to a file, or create one with `aurora encode`",
        ));
    }
    if !capture.is_file() {
        return Err(CliError::hinted(
            format!("capture is not a file: {}", capture.display()),
            "pass the raw byte dump of the characteristic writes, not a directory",
        ));
    }
    Ok(capture)
}

fn single_glob_match(pattern: &str) -> Result<PathBuf, CliError> {
    let bad_pattern = |detail: String| {
        CliError::hinted(format!("invalid capture pattern '{}'", pattern), detail)
    };
    let mut captures = Vec::new();
    for entry in glob(pattern).map_err(|err| bad_pattern(err.msg.to_string()))? {
        let path = entry.map_err(|err| bad_pattern(err.to_string()))?;
        if path.is_file() {
            captures.push(path);
        }
    }

    match captures.len() {
        0 => Err(CliError::hinted(
            format!("no capture matches '{}'", pattern),
            "check the directory, and quote the pattern so the shell leaves it alone",
        )),
        1 => Ok(captures.remove(0)),
        n => {
            let mut listed = captures
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if n > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::hinted(
                format!("{} captures match '{}': {}", n, pattern, listed),
                "each replay starts a fresh decoder; run `aurora replay` once per capture",
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}
