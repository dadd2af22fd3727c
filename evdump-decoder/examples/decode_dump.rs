//! Standalone input-event dump decoder tool
//!
//! This tool decodes a dump file and displays the symbol tables, the decoded
//! records and per-channel statistics.
//!
//! Usage:
//!   decode_dump <dump.yml> [--limit <count>] [--verbose]
//!
//! Example:
//!   decode_dump session.yml --limit 100 --verbose

use evdump_decoder::{Decoder, ParsedDump};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

struct DumpStats {
    total_records: usize,
    records_per_type: HashMap<String, usize>,
    records_per_code: HashMap<String, usize>,
}

impl DumpStats {
    fn from_dump(dump: &ParsedDump) -> Self {
        let mut stats = Self {
            total_records: 0,
            records_per_type: HashMap::new(),
            records_per_code: HashMap::new(),
        };
        for record in dump.events.records() {
            stats.total_records += 1;
            *stats.records_per_type.entry(record.type_name.clone()).or_insert(0) += 1;
            *stats.records_per_code.entry(record.code_name.clone()).or_insert(0) += 1;
        }
        stats
    }

    fn print_summary(&self, skipped_lines: usize) {
        println!("\n=== DECODING SUMMARY ===");
        println!("Total records decoded: {}", self.total_records);
        println!("Other lines skipped: {}", skipped_lines);
        println!("Unique event types seen: {}", self.records_per_type.len());
        println!("Unique event codes seen: {}", self.records_per_code.len());

        if !self.records_per_code.is_empty() {
            println!("\nTop 10 Most Frequent Codes:");
            let mut sorted: Vec<_> = self.records_per_code.iter().collect();
            sorted.sort_by(|a, b| b.1.cmp(a.1));
            for (name, count) in sorted.iter().take(10) {
                println!("  {}: {} times", name, count);
            }
        }
    }
}

fn print_symbols(dump: &ParsedDump) {
    println!("=== SYMBOL TABLES ===");
    for (type_id, type_name) in dump.symbols.types() {
        println!("Type {} ({})", type_id, type_name);
        for (code_id, code_name) in dump.symbols.codes_for_type(type_id) {
            print!("    Code {} ({})", code_id, code_name);
            if let Some(props) = dump.symbols.properties(code_name) {
                let rendered: Vec<String> =
                    props.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                print!("  [{}]", rendered.join(", "));
            }
            println!();
        }
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <dump.yml> [--limit <count>] [--verbose]", args[0]);
        eprintln!("\nExample:");
        eprintln!("  {} session.yml --limit 100", args[0]);
        std::process::exit(1);
    }

    let dump_file = PathBuf::from(&args[1]);
    let mut limit: Option<usize> = None;
    let mut verbose = false;

    // Parse arguments
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                i += 1;
                if i < args.len() {
                    limit = Some(args[i].parse()?);
                }
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    println!("=== Input Event Dump Decoder ===");
    println!("Dump file: {:?}", dump_file);
    if let Some(n) = limit {
        println!("Limit: {} records", n);
    }
    println!();

    let decoder = Decoder::new();
    let dump = decoder.parse_file(&dump_file)?;

    if verbose {
        print_symbols(&dump);
    }

    println!("=== RECORDS ===\n");
    for (count, record) in dump.events.records().iter().enumerate() {
        if let Some(max) = limit {
            if count >= max {
                println!("\n... (limit of {} records reached)", max);
                break;
            }
        }
        println!("{}", record);
    }

    DumpStats::from_dump(&dump).print_summary(dump.events.skipped_lines());

    println!("\n=== CHANNELS ===");
    for series in dump.channels.iter() {
        let span = series
            .time_range()
            .map(|(start, end)| format!("{:.6}s .. {:.6}s", start, end))
            .unwrap_or_default();
        println!(
            "  {}/{}: {} samples {}{}",
            series.type_name,
            series.code_name,
            series.len(),
            span,
            if series.declared { "" } else { " (code resolved by id only)" }
        );
    }

    match dump.trace(decoder.config()) {
        Ok(trace) => println!(
            "\nPressure trace: {} rows, max pressure {}",
            trace.len(),
            trace.max_pressure
        ),
        Err(e) => println!("\nNo pressure trace: {}", e),
    }

    Ok(())
}
