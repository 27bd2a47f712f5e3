use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::counts::value_counts;
use super::model::{
    ContentType, DurationUnit, GenreRow, PreparedDataset, RawRow, Record, YearRange, UNKNOWN,
};

/// How many countries are offered in the country filter.
pub const TOP_COUNTRY_LIMIT: usize = 10;

/// Formats tried, in order, when parsing `date_added`.
const DATE_FORMATS: [&str; 5] = ["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d", "%m/%d/%Y", "%d-%b-%y"];

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("static regex is valid"));

// ---------------------------------------------------------------------------
// Field parsers – each total, absent on failure
// ---------------------------------------------------------------------------

/// Treat blank cells as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a `date_added` cell such as `"September 25, 2021"`.
pub fn parse_date_added(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parse a release year from integer text or integral float text (`"2019.0"`).
pub fn parse_release_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

/// First run of digits in a duration string: `"2 Seasons"` → `2`.
/// A run too long for `u64` is absent.
pub fn extract_duration_num(raw: &str) -> Option<u64> {
    FIRST_INTEGER.find(raw)?.as_str().parse().ok()
}

impl DurationUnit {
    /// Classify by substring; `"min"` takes precedence over `"Season"`.
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            Some(text) if text.contains("min") => DurationUnit::Minute,
            Some(text) if text.contains("Season") => DurationUnit::Season,
            _ => DurationUnit::Unknown,
        }
    }
}

/// Split a `listed_in` cell into genres. Absent input gives no genres;
/// empty tokens between separators are kept as genres.
pub fn split_genres(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(text) => text.split(", ").map(str::to_owned).collect(),
        None => Vec::new(),
    }
}

/// Fill an absent value with [`UNKNOWN`], reporting whether it was filled.
fn fill_unknown(value: Option<String>) -> (String, bool) {
    match value {
        Some(v) => (v, false),
        None => (UNKNOWN.to_owned(), true),
    }
}

// ---------------------------------------------------------------------------
// Row and table preparation
// ---------------------------------------------------------------------------

/// Clean a single row. Every row survives; an absent or unrecognised type
/// leaves `kind` empty.
pub fn prepare_record(raw: RawRow) -> Record {
    let kind = present(raw.kind).and_then(|k| ContentType::parse(&k));

    let date_added = present(raw.date_added).and_then(|d| parse_date_added(&d));
    let (country, country_imputed) = fill_unknown(present(raw.country));
    let (rating, rating_imputed) = fill_unknown(present(raw.rating));

    let duration_raw = present(raw.duration);
    let duration_num = duration_raw.as_deref().and_then(extract_duration_num);
    let duration_unit = DurationUnit::classify(duration_raw.as_deref());

    let listed_in = present(raw.listed_in);

    Record {
        show_id: present(raw.show_id),
        title: raw.title.unwrap_or_default(),
        kind,
        director: present(raw.director),
        cast: present(raw.cast),
        country,
        country_imputed,
        release_year: present(raw.release_year).and_then(|y| parse_release_year(&y)),
        year_added: date_added.map(|d| d.year()),
        date_added,
        rating,
        rating_imputed,
        duration_raw,
        duration_num,
        duration_unit,
        movie_duration: duration_num.filter(|_| kind == Some(ContentType::Movie)),
        tv_seasons: duration_num.filter(|_| kind == Some(ContentType::TvShow)),
        genres: split_genres(listed_in.as_deref()),
        description: present(raw.description),
    }
}

/// Build the immutable prepared table from raw source rows.
pub fn prepare(raw_rows: Vec<RawRow>) -> PreparedDataset {
    let records: Vec<Record> = raw_rows.into_iter().map(prepare_record).collect();
    let untyped = records.iter().filter(|r| r.kind.is_none()).count();
    if untyped > 0 {
        log::warn!(
            "{untyped} of {} rows have a missing or unknown type",
            records.len()
        );
    }

    let genre_rows: Vec<GenreRow> = records
        .iter()
        .enumerate()
        .flat_map(|(i, rec)| {
            rec.genres.iter().map(move |genre| GenreRow {
                record: i,
                genre: genre.clone(),
            })
        })
        .collect();

    let years = records.iter().filter_map(|r| r.release_year);
    let year_bounds = years
        .clone()
        .min()
        .zip(years.max())
        .map(|(min, max)| YearRange::new(min, max));

    let top_countries = value_counts(records.iter().map(|r| r.country.as_str()))
        .into_iter()
        .take(TOP_COUNTRY_LIMIT)
        .map(|(country, _)| country.to_owned())
        .collect();

    log::info!(
        "Prepared {} records ({} genre rows), release years {:?}",
        records.len(),
        genre_rows.len(),
        year_bounds
    );

    PreparedDataset {
        records,
        genre_rows,
        year_bounds,
        top_countries,
    }
}
