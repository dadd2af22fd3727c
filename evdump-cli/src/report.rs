//! Console report
//!
//! Prints the symbol tables, channel overview and trace summary.

use chrono::{DateTime, Utc};
use evdump_decoder::{ParsedDump, PressureTrace};

/// Timestamps below one day are treated as relative to the recording start
const ABSOLUTE_TIME_THRESHOLD: f64 = 86_400.0;

/// Render a dump timestamp for display
pub fn format_timestamp(t: f64) -> String {
    if t < ABSOLUTE_TIME_THRESHOLD {
        return format!("+{:.6}s", t);
    }
    let secs = t.trunc() as i64;
    let nanos = ((t - t.trunc()) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::<Utc>::from_timestamp(secs, nanos)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.6f UTC").to_string())
        .unwrap_or_else(|| format!("{:.6}s", t))
}

/// Print the type/code/property tables
pub fn print_symbols(dump: &ParsedDump) {
    println!("\n📖 Symbol Tables:");
    for (type_id, type_name) in dump.symbols.types() {
        println!("  Type {} ({})", type_id, type_name);
        for (code_id, code_name) in dump.symbols.codes_for_type(type_id) {
            match dump.symbols.properties(code_name) {
                Some(props) => {
                    let rendered: Vec<String> =
                        props.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                    println!("    Code {} ({}) [{}]", code_id, code_name, rendered.join(", "));
                }
                None => println!("    Code {} ({})", code_id, code_name),
            }
        }
    }
}

/// Print symbol statistics and the observed channels
pub fn print_dump_summary(dump: &ParsedDump) {
    let stats = dump.symbols.stats();
    println!("\n📊 Symbol Tables:");
    println!("  Types:      {}", stats.num_types);
    println!("  Codes:      {}", stats.num_codes);
    println!("  Properties: {}", stats.num_properties);

    println!("\n📄 Events:");
    println!("  Records:       {}", dump.events.len());
    println!("  Skipped lines: {}", dump.events.skipped_lines());

    if let Some(first) = dump.events.records().first() {
        println!("  Start:         {}", format_timestamp(first.timestamp));
    }

    println!("\n📈 Channels:");
    for series in dump.channels.iter() {
        let span = series
            .time_range()
            .map(|(start, end)| format!("{:.3}s", end - start))
            .unwrap_or_default();
        println!(
            "  {:<8} {:<20} {:>7} samples  {}",
            series.type_name,
            series.code_name,
            series.len(),
            span
        );
    }
}

/// Print the aligned trace summary
pub fn print_trace_summary(trace: &PressureTrace) {
    let rising = trace.frame.dpdt.iter().filter(|d| **d > 0.0).count();
    let falling = trace.frame.dpdt.iter().filter(|d| **d < 0.0).count();

    println!("\n🎨 Pressure Trace:");
    println!("  Rows:         {}", trace.len());
    println!("  Max pressure: {}", trace.max_pressure);
    println!("  Rising:       {}", rising);
    println!("  Falling:      {}", falling);
    println!("  Flat:         {}", trace.len() - rising - falling);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_relative_timestamp() {
        assert_eq!(format_timestamp(0.0), "+0.000000s");
        assert_eq!(format_timestamp(1.5), "+1.500000s");
    }

    #[test]
    fn test_format_absolute_timestamp() {
        assert_eq!(
            format_timestamp(1_700_000_000.25),
            "2023-11-14 22:13:20.250000 UTC"
        );
    }
}
