use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Columns every source must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "title",
    "type",
    "country",
    "date_added",
    "release_year",
    "rating",
    "duration",
    "listed_in",
];

/// Fill value for absent `country` and `rating` fields.
pub const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// ContentType – Movie or TV Show
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ContentType {
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl ContentType {
    /// Facet order used by every chart that splits by type.
    pub const ALL: [ContentType; 2] = [ContentType::Movie, ContentType::TvShow];

    /// Parse the raw `type` column (`"Movie"` / `"TV Show"`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Movie" => Some(ContentType::Movie),
            "TV Show" => Some(ContentType::TvShow),
            _ => None,
        }
    }

    /// Label as it appears in the source data and in chart legends.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::TvShow => "TV Show",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unit inferred from the raw duration text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Minute,
    Season,
    Unknown,
}

// ---------------------------------------------------------------------------
// RawRow – one untyped row as read from a source
// ---------------------------------------------------------------------------

/// A source row before cleaning. Every cell is optional text; blank cells
/// are treated as absent during preparation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub show_id: Option<String>,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<String>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
    pub description: Option<String>,
}

impl RawRow {
    /// Build a row by asking `get` for each known column name.
    pub fn from_lookup(mut get: impl FnMut(&str) -> Option<String>) -> Self {
        RawRow {
            show_id: get("show_id"),
            kind: get("type"),
            title: get("title"),
            director: get("director"),
            cast: get("cast"),
            country: get("country"),
            date_added: get("date_added"),
            release_year: get("release_year"),
            rating: get("rating"),
            duration: get("duration"),
            listed_in: get("listed_in"),
            description: get("description"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the prepared table
// ---------------------------------------------------------------------------

/// A cleaned catalog entry. Never mutated after preparation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub show_id: Option<String>,
    pub title: String,
    /// `None` when the source type is absent or neither Movie nor TV Show.
    pub kind: Option<ContentType>,
    pub director: Option<String>,
    pub cast: Option<String>,
    /// Raw country text, possibly a `", "`-separated list.
    pub country: String,
    /// `true` when `country` was absent in the source and filled with [`UNKNOWN`].
    pub country_imputed: bool,
    pub release_year: Option<i32>,
    pub date_added: Option<NaiveDate>,
    pub year_added: Option<i32>,
    pub rating: String,
    pub rating_imputed: bool,
    pub duration_raw: Option<String>,
    pub duration_num: Option<u64>,
    pub duration_unit: DurationUnit,
    pub movie_duration: Option<u64>,
    pub tv_seasons: Option<u64>,
    pub genres: Vec<String>,
    pub description: Option<String>,
}

impl Record {
    /// Individual countries of a multi-country field.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.country.split(", ")
    }
}

/// One row of the exploded-by-genre view: a record paired with one of its genres.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreRow {
    pub record: usize,
    pub genre: String,
}

/// Inclusive range of release years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        YearRange { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

// ---------------------------------------------------------------------------
// PreparedDataset – the immutable table shared by every recomputation
// ---------------------------------------------------------------------------

/// The prepared table, its genre-exploded view and the lookups used to
/// initialise filter controls.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    /// All records (rows).
    pub records: Vec<Record>,
    /// One entry per (record, genre) pair.
    pub genre_rows: Vec<GenreRow>,
    /// Observed release-year bounds, `None` when no record has a year.
    pub year_bounds: Option<YearRange>,
    /// The ten most frequent raw `country` values.
    pub top_countries: Vec<String>,
}

impl PreparedDataset {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
