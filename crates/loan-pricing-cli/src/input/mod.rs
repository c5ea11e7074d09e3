//! Request resolution: `--input` file, piped stdin, or nothing (flags only).

use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Resolve a JSON request from `--input` or piped stdin, if either is present.
pub fn read_request(path: Option<&str>) -> CliResult<Option<Value>> {
    if let Some(path) = path {
        log::debug!("reading request from {path}");
        return read_file(path).map(Some);
    }
    let piped = read_stdin()?;
    if piped.is_some() {
        log::debug!("reading request from stdin");
    }
    Ok(piped)
}

/// Today's date, used when a request does not pin its own reference date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Fill in `reference_date` on a JSON request that omits it.
pub fn with_reference_date(mut value: Value, date: NaiveDate) -> Value {
    if let Value::Object(ref mut map) = value {
        map.entry("reference_date")
            .or_insert_with(|| Value::String(date.to_string()));
    }
    value
}

fn read_file(path: &str) -> CliResult<Value> {
    let full = resolve_path(path)?;
    let contents = fs::read_to_string(&full)
        .map_err(|e| format!("Failed to read '{}': {}", full.display(), e))?;
    let value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", full.display(), e))?;
    Ok(value)
}

fn resolve_path(path: &str) -> CliResult<PathBuf> {
    let p = PathBuf::from(path);
    let full = if p.is_absolute() {
        p
    } else {
        std::env::current_dir()?.join(p)
    };
    if !full.is_file() {
        return Err(format!("Request file not found: {}", full.display()).into());
    }
    Ok(full)
}

/// Piped JSON on stdin. `None` when stdin is a terminal or empty.
fn read_stdin() -> CliResult<Option<Value>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}
