use serde::Serialize;

use super::model::{ContentType, GenreRow, PreparedDataset, Record, YearRange};

// ---------------------------------------------------------------------------
// Filter state: the three dashboard controls
// ---------------------------------------------------------------------------

/// Content-type dropdown value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ContentType),
}

/// Country dropdown value. A selected country matches by substring.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum CountryFilter {
    #[default]
    All,
    Containing(String),
}

/// Current values of the year slider, type dropdown and country dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub year_range: YearRange,
    pub content_type: TypeFilter,
    pub country: CountryFilter,
}

impl Filters {
    /// Initial control values: the full observed year range, all types, all countries.
    pub fn defaults(dataset: &PreparedDataset) -> Self {
        Filters {
            year_range: dataset.year_bounds.unwrap_or(YearRange::new(0, 0)),
            content_type: TypeFilter::All,
            country: CountryFilter::All,
        }
    }

    /// Whether a record passes all three filters.
    ///
    /// * Records without a release year never pass the year filter.
    /// * A country selection matches when the raw (possibly multi-country)
    ///   field contains it as a case-sensitive substring, so `"India"` also
    ///   matches `"Indiana-made"`.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(year) = record.release_year else {
            return false;
        };
        if !self.year_range.contains(year) {
            return false;
        }
        if let TypeFilter::Only(kind) = self.content_type {
            if record.kind != Some(kind) {
                return false;
            }
        }
        match &self.country {
            CountryFilter::All => true,
            CountryFilter::Containing(name) => record.country.contains(name.as_str()),
        }
    }
}

/// Return indices of records that pass the filters, in table order.
pub fn filtered_indices(dataset: &PreparedDataset, filters: &Filters) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| filters.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Rows of the exploded-by-genre view whose record passes the filters.
pub fn filtered_genre_rows<'a>(
    dataset: &'a PreparedDataset,
    filters: &Filters,
) -> Vec<&'a GenreRow> {
    dataset
        .genre_rows
        .iter()
        .filter(|row| filters.matches(&dataset.records[row.record]))
        .collect()
}
