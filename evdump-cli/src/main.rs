//! Input Event Dump CLI Application
//!
//! This is the command-line interface for the input-event dump decoder.
//! It uses the evdump-decoder library and adds:
//! - Argument parsing and TOML configuration
//! - Console summaries of symbols, channels and the pressure trace
//! - Export of the trace for an external 3D renderer (JSON/CSV)

use anyhow::{Context, Result};
use clap::Parser;
use evdump_decoder::{ColorDriver, Decoder, TimeAxis};
use std::path::PathBuf;

mod config;
mod export;
mod report;

use config::{AppConfig, OutputFormat};

/// Input Event Dump Decoder - build a position/pressure trace from an event dump
#[derive(Parser, Debug)]
#[command(name = "evdump-cli")]
#[command(about = "Decode input-event dumps into a position/pressure trace", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the event dump to decode
    #[arg(short, long, value_name = "FILE")]
    dump: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file for the renderer hand-off (default: summary only)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Abscissa for interpolation and the pressure derivative
    #[arg(long, value_enum)]
    time_axis: Option<TimeAxisArg>,

    /// Quantity that positions points inside their color range
    #[arg(long, value_enum)]
    color_driver: Option<ColorDriverArg>,

    /// Print the type/code/property tables
    #[arg(long)]
    list_symbols: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum TimeAxisArg {
    Timestamp,
    SampleIndex,
}

impl From<TimeAxisArg> for TimeAxis {
    fn from(arg: TimeAxisArg) -> Self {
        match arg {
            TimeAxisArg::Timestamp => TimeAxis::Timestamp,
            TimeAxisArg::SampleIndex => TimeAxis::SampleIndex,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ColorDriverArg {
    Pressure,
    Derivative,
}

impl From<ColorDriverArg> for ColorDriver {
    fn from(arg: ColorDriverArg) -> Self {
        match arg {
            ColorDriverArg::Pressure => ColorDriver::Pressure,
            ColorDriverArg::Derivative => ColorDriver::Derivative,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Input Event Dump CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", evdump_decoder::VERSION);

    let Some(config) = resolve_config(&args)? else {
        println!("Input Event Dump Decoder - No input specified");
        println!("\nQuick Start:");
        println!("  evdump-cli --dump session.yml");
        println!("  evdump-cli --dump session.yml --output trace.json");
        println!("\nWith a configuration file:");
        println!("  evdump-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    };

    run(&config, &args)
}

/// Merge the configuration file (if any) with command-line overrides
fn resolve_config(args: &Args) -> Result<Option<AppConfig>> {
    let mut config = match (&args.config, &args.dump) {
        (Some(path), _) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        (None, Some(dump)) => AppConfig::for_dump(dump.clone()),
        (None, None) => return Ok(None),
    };

    if let Some(dump) = &args.dump {
        config.input.dump = dump.clone();
    }
    if let Some(output) = &args.output {
        config.output.path = Some(output.clone());
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(time_axis) = args.time_axis {
        config.align.time_axis = time_axis.into();
    }
    if let Some(driver) = args.color_driver {
        config.color.driver = driver.into();
    }

    log::debug!("Effective configuration: {:?}", config);
    Ok(Some(config))
}

/// Decode the dump, print summaries and write the hand-off file
fn run(config: &AppConfig, args: &Args) -> Result<()> {
    let decoder = Decoder::with_config(config.trace_config());

    let dump = decoder
        .parse_file(&config.input.dump)
        .with_context(|| format!("Failed to decode dump: {:?}", config.input.dump))?;

    let trace = dump
        .trace(decoder.config())
        .context("Failed to build pressure trace")?;

    if !args.quiet {
        println!("═══════════════════════════════════════════════");
        println!("  Input Event Dump Decoder");
        println!("═══════════════════════════════════════════════");
        println!("\nDump: {:?}", config.input.dump);

        if args.list_symbols {
            report::print_symbols(&dump);
        }
        report::print_dump_summary(&dump);
        report::print_trace_summary(&trace);
    }

    if let Some(path) = &config.output.path {
        export::export_trace(
            path,
            &trace,
            config.color.driver,
            &config.plot,
            config.output.format,
        )?;
        if !args.quiet {
            println!("\n✓ Trace written to {:?}", path);
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
