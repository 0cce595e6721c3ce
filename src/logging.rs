//! Structured logging: one JSON object per line, leveled and filterable by
//! domain. Lines go to stdout; set LOG_DIR to also append to an
//! `events.jsonl` under it.

use chrono::Utc;
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Domain categories for filtering via LOG_DOMAINS (comma-separated, or
/// "all").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Traversal,
    Submission,
    Gate,
    Api,
    System,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Traversal => "traversal",
            Domain::Submission => "submission",
            Domain::Gate => "gate",
            Domain::Api => "api",
            Domain::System => "system",
        }
    }

    pub fn is_enabled(&self) -> bool {
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static FILE_SINK: OnceLock<Option<Mutex<BufWriter<File>>>> = OnceLock::new();

fn file_sink() -> &'static Option<Mutex<BufWriter<File>>> {
    FILE_SINK.get_or_init(|| {
        let dir = std::env::var("LOG_DIR").ok()?;
        let mut path = PathBuf::from(dir);
        if let Err(err) = create_dir_all(&path) {
            eprintln!("[log] cannot create LOG_DIR: {}", err);
            return None;
        }
        path.push("events.jsonl");
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(Mutex::new(BufWriter::new(file))),
            Err(err) => {
                eprintln!("[log] cannot open {}: {}", path.display(), err);
                None
            }
        }
    })
}

/// RFC3339 timestamp with milliseconds.
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Emit a structured entry if it passes the level and domain filters.
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }

    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert(
        "seq".to_string(),
        json!(LOG_SEQ.fetch_add(1, Ordering::SeqCst)),
    );
    entry.insert("lvl".to_string(), json!(level.as_str()));
    entry.insert("domain".to_string(), json!(domain.as_str()));
    entry.insert("event".to_string(), json!(event));
    entry.insert("data".to_string(), Value::Object(fields));

    let line = Value::Object(entry).to_string();
    println!("{}", line);
    if let Some(sink) = file_sink() {
        if let Ok(mut w) = sink.lock() {
            let _ = writeln!(w, "{}", line);
            let _ = w.flush();
        }
    }
}

/// Info-level shorthand.
pub fn json_log(domain: Domain, event: &str, fields: Map<String, Value>) {
    log(Level::Info, domain, event, fields);
}

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

pub fn v_int(n: u64) -> Value {
    json!(n)
}

pub fn v_bool(b: bool) -> Value {
    json!(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering_filters() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn obj_builds_field_maps() {
        let fields = obj(&[
            ("report_id", v_str("r-1")),
            ("progress", v_num(0.5)),
            ("position", v_int(3)),
            ("unlocked", v_bool(false)),
        ]);
        assert_eq!(fields["report_id"], "r-1");
        assert_eq!(fields["progress"], 0.5);
        assert_eq!(fields["position"], 3);
        assert_eq!(fields["unlocked"], false);
    }

    #[test]
    fn timestamps_are_rfc3339_millis() {
        let ts = ts_now();
        assert!(ts.ends_with('Z'));
        assert!(ts.contains('.'));
    }

    #[test]
    fn domain_names_are_stable() {
        for d in [
            Domain::Traversal,
            Domain::Submission,
            Domain::Gate,
            Domain::Api,
            Domain::System,
        ] {
            assert!(!d.as_str().is_empty());
        }
    }
}
