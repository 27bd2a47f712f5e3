use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{DataLoadError, LoadAttempt};
use super::model::{RawRow, REQUIRED_COLUMNS};
use crate::config::Config;

// ---------------------------------------------------------------------------
// Sources, in the order they are tried
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Remote(String),
    Local(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote(url) => write!(f, "{url}"),
            Source::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Remote source first, then the local fallback.
pub fn sources(config: &Config) -> Vec<Source> {
    config
        .remote_url
        .iter()
        .map(|url| Source::Remote(url.clone()))
        .chain(config.local_path.iter().map(|p| Source::Local(p.clone())))
        .collect()
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Obtain raw rows from the first source that yields any.
///
/// Every failed source is logged and recorded; when all of them fail the
/// attempts are returned in [`DataLoadError::Exhausted`].
pub fn load_raw_rows(config: &Config) -> Result<Vec<RawRow>, DataLoadError> {
    let sources = sources(config);
    if sources.is_empty() {
        return Err(DataLoadError::NoSources);
    }

    let mut attempts = Vec::new();
    for source in sources {
        let cause = match load_source(&source, config) {
            Ok(rows) if !rows.is_empty() => {
                log::info!("Loaded {} rows from {source}", rows.len());
                return Ok(rows);
            }
            Ok(_) => "source contains no rows".to_string(),
            Err(e) => format!("{e:#}"),
        };
        log::warn!("Could not load {source}: {cause}");
        attempts.push(LoadAttempt {
            source: source.to_string(),
            cause,
        });
    }

    Err(DataLoadError::Exhausted { attempts })
}

fn load_source(source: &Source, config: &Config) -> Result<Vec<RawRow>> {
    match source {
        Source::Remote(url) => {
            let bytes = fetch_remote(url, config)?;
            parse_csv_bytes(&bytes)
        }
        Source::Local(path) => load_file(path),
    }
}

fn fetch_remote(url: &str, config: &Config) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(config.fetch_timeout)
        .build()
        .context("building HTTP client")?;
    let response = client
        .get(url)
        .send()
        .context("sending request")?
        .error_for_status()
        .context("server returned an error status")?;
    let bytes = response.bytes().context("reading response body")?;
    Ok(bytes.to_vec())
}

/// Load a local file. Dispatch by extension; anything unrecognised is read as CSV.
///
/// Supported formats:
/// * `.csv`     – header row plus one title per line
/// * `.json`    – `[{ "title": ..., "type": ..., ... }, ...]`
/// * `.parquet` – one column per field (string or numeric)
pub fn load_file(path: &Path) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        _ => {
            let bytes = std::fs::read(path).context("reading CSV file")?;
            parse_csv_bytes(&bytes)
        }
    }
}

fn check_required_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let present: BTreeSet<&str> = columns.into_iter().collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect();
    if !missing.is_empty() {
        bail!("missing required columns: {}", missing.join(", "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Decode as UTF-8, falling back to latin-1 (every byte maps to one char).
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)),
        Err(e) => {
            log::warn!("Input is not valid UTF-8 ({e}), decoding as latin-1");
            Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())
        }
    }
}

/// Parse CSV bytes with a header row into raw rows.
pub fn parse_csv_bytes(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let text = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    check_required_columns(headers.iter().map(String::as_str))?;

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(RawRow::from_lookup(|name| {
            index
                .get(name)
                .and_then(|&i| record.get(i))
                .map(str::to_owned)
        }));
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "title": "Dick Johnson Is Dead", "type": "Movie", "release_year": 2020, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let objects = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<_>>>()?;

    if !objects.is_empty() {
        check_required_columns(objects.iter().flat_map(|obj| obj.keys().map(String::as_str)))?;
    }

    Ok(objects
        .into_iter()
        .map(|obj| RawRow::from_lookup(|name| obj.get(name).and_then(json_to_text)))
        .collect())
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); `release_year` may be stored as an
/// integer or float column.
fn load_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    check_required_columns(
        builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str()),
    )?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let columns: HashMap<&str, &Arc<dyn Array>> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().as_str(), batch.column(i)))
            .collect();

        for row in 0..batch.num_rows() {
            rows.push(RawRow::from_lookup(|name| {
                columns.get(name).and_then(|col| extract_text(col, row))
            }));
        }
    }

    Ok(rows)
}

/// Render a single Arrow cell as text; nulls and unsupported types are absent.
fn extract_text(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => Some(any.downcast_ref::<StringArray>()?.value(row).to_string()),
        DataType::LargeUtf8 => Some(any.downcast_ref::<LargeStringArray>()?.value(row).to_string()),
        DataType::Int32 => Some(any.downcast_ref::<Int32Array>()?.value(row).to_string()),
        DataType::Int64 => Some(any.downcast_ref::<Int64Array>()?.value(row).to_string()),
        DataType::Float32 => Some(any.downcast_ref::<Float32Array>()?.value(row).to_string()),
        DataType::Float64 => Some(any.downcast_ref::<Float64Array>()?.value(row).to_string()),
        DataType::Boolean => Some(any.downcast_ref::<BooleanArray>()?.value(row).to_string()),
        other => {
            log::debug!("Ignoring parquet cell of type {other:?}");
            None
        }
    }
}
