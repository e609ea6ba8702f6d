//! Console watcher for the simulator's physics telemetry page
//!
//! Polls the shared memory page on a fixed interval, decodes each record
//! and renders `name: value` lines, optionally filtered by name prefix.
//! With `--json` each tick is emitted as one JSON object instead.

use clap::Parser;
use colored::Colorize;
use std::thread;
use std::time::Duration;

use actelem::{decode_record, physics_layout, TelemetryPage, TelemetrySnapshot, TelemetryValue};

#[derive(Parser, Debug)]
#[command(name = "actelem-watch")]
#[command(about = "Watch Assetto Corsa telemetry from shared memory", long_about = None)]
struct Cli {
    /// Name of the shared memory page to read
    #[arg(long, default_value = actelem::PHYSICS_PAGE)]
    page: String,

    /// Polling interval in milliseconds
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,

    /// Render only fields whose name starts with this prefix
    #[arg(short, long)]
    prefix: Option<String>,

    /// Emit one JSON object per tick instead of the table
    #[arg(short, long)]
    json: bool,

    /// Read a single record, then exit
    #[arg(long)]
    once: bool,
}

fn main() {
    let args = Cli::parse();

    if let Err(e) = run(&args) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: &Cli) -> actelem::Result<()> {
    let layout = physics_layout();
    let page = TelemetryPage::open(&args.page, layout.byte_size())?;
    let mut buf = vec![0u8; layout.byte_size()];

    loop {
        page.read_record(&mut buf);
        let snapshot = decode_record(layout, &buf)?;

        if args.json {
            println!("{}", snapshot_json(&snapshot));
        } else {
            // clear screen, cursor home
            print!("\x1B[2J\x1B[H");
            println!(
                "{} {}",
                "actelem-watch".cyan().bold(),
                format!("({})", page.name()).dimmed()
            );
            print!("{}", render_snapshot(&snapshot, args.prefix.as_deref()));
        }

        if args.once {
            break;
        }
        thread::sleep(Duration::from_millis(args.interval_ms));
    }

    Ok(())
}

/// Render a snapshot as `name: value` lines in wire order
fn render_snapshot(snapshot: &TelemetrySnapshot, prefix: Option<&str>) -> String {
    let mut out = String::new();
    for (name, value) in snapshot.iter() {
        if let Some(prefix) = prefix {
            if !name.starts_with(prefix) {
                continue;
            }
        }
        out.push_str(&format!("{name:>20}: {value}\n"));
    }
    out
}

/// Serialize a snapshot as a JSON object, preserving wire order
fn snapshot_json(snapshot: &TelemetrySnapshot) -> serde_json::Value {
    let mut map = serde_json::Map::with_capacity(snapshot.len());
    for (name, value) in snapshot.iter() {
        let json = match value {
            TelemetryValue::Int(v) => serde_json::Value::from(*v),
            TelemetryValue::Float(v) => serde_json::Value::from(*v),
            TelemetryValue::Ints(v) => {
                serde_json::Value::Array(v.iter().map(|x| serde_json::Value::from(*x)).collect())
            }
            TelemetryValue::Floats(v) => {
                serde_json::Value::Array(v.iter().map(|x| serde_json::Value::from(*x)).collect())
            }
        };
        map.insert(name.to_string(), json);
    }
    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actelem::{FieldDescriptor, RecordLayout};

    static FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::int("gear"),
        FieldDescriptor::floats("wheelSlip", 2),
        FieldDescriptor::float("kersCharge").reserved(),
        FieldDescriptor::float("speedKmh"),
    ];

    fn sample_snapshot() -> TelemetrySnapshot {
        let layout = RecordLayout::new(FIELDS).unwrap();
        let mut buf = Vec::new();
        buf.extend_from_slice(&3i32.to_le_bytes());
        buf.extend_from_slice(&0.25f32.to_le_bytes());
        buf.extend_from_slice(&0.5f32.to_le_bytes());
        buf.extend_from_slice(&0.0f32.to_le_bytes());
        buf.extend_from_slice(&180.0f32.to_le_bytes());
        decode_record(&layout, &buf).unwrap()
    }

    #[test]
    fn render_lists_fields_in_wire_order() {
        let rendered = render_snapshot(&sample_snapshot(), None);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("gear: 3"));
        assert!(lines[1].ends_with("wheelSlip: [0.25, 0.5]"));
        assert!(lines[2].ends_with("speedKmh: 180"));
    }

    #[test]
    fn render_filters_by_prefix() {
        let rendered = render_snapshot(&sample_snapshot(), Some("wheel"));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("wheelSlip"));
    }

    #[test]
    fn json_keeps_shape_and_order() {
        let json = snapshot_json(&sample_snapshot());
        let object = json.as_object().unwrap();

        let keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["gear", "wheelSlip", "speedKmh"]);

        assert_eq!(object["gear"], serde_json::json!(3));
        assert_eq!(object["wheelSlip"].as_array().unwrap().len(), 2);
        assert_eq!(object["speedKmh"].as_f64().unwrap(), 180.0);
    }
}
