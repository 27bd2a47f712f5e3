//! Row builders shared by unit tests.

use super::model::{PreparedDataset, RawRow};
use super::prepare::prepare;

pub fn raw(
    title: &str,
    kind: &str,
    release_year: Option<&str>,
    country: Option<&str>,
    listed_in: Option<&str>,
) -> RawRow {
    RawRow {
        title: Some(title.to_owned()),
        kind: Some(kind.to_owned()),
        release_year: release_year.map(str::to_owned),
        country: country.map(str::to_owned),
        listed_in: listed_in.map(str::to_owned),
        ..RawRow::default()
    }
}

/// Two records: a 2019 Indian comedy film and a 2020 US drama/comedy show.
pub fn two_title_dataset() -> PreparedDataset {
    let mut movie = raw("Film", "Movie", Some("2019"), Some("India"), Some("Comedy"));
    movie.duration = Some("90 min".into());
    movie.date_added = Some("January 1, 2020".into());

    let mut show = raw("Show", "TV Show", Some("2020"), Some("USA"), Some("Drama, Comedy"));
    show.duration = Some("2 Seasons".into());
    show.date_added = Some("March 5, 2021".into());

    prepare(vec![movie, show])
}

/// A mixed catalog covering multi-country fields, missing values and
/// several years.
pub fn mixed_dataset() -> PreparedDataset {
    let rows = vec![
        with_extras(
            raw("A", "Movie", Some("2015"), Some("India, United States"), Some("Dramas, International Movies")),
            "120 min",
            "June 1, 2018",
        ),
        with_extras(
            raw("B", "Movie", Some("2018"), Some("United States"), Some("Comedies")),
            "95 min",
            "July 2, 2019",
        ),
        with_extras(
            raw("C", "TV Show", Some("2018"), Some("United Kingdom"), Some("British TV Shows, Docuseries")),
            "3 Seasons",
            "July 3, 2019",
        ),
        with_extras(
            raw("D", "TV Show", Some("2020"), None, Some("Kids' TV")),
            "1 Season",
            "not a date",
        ),
        with_extras(
            raw("E", "Movie", None, Some("Canada"), Some("Dramas")),
            "88 min",
            "May 9, 2020",
        ),
        with_extras(
            raw("F", "Movie", Some("2020"), Some("United States, Canada"), Some("Comedies, Dramas")),
            "",
            "May 10, 2020",
        ),
        with_extras(
            raw("G", "Movie", Some("2019"), Some("Indiana-made"), None),
            "101 min",
            "December 24, 2019",
        ),
    ];
    prepare(rows)
}

fn with_extras(mut row: RawRow, duration: &str, date_added: &str) -> RawRow {
    row.duration = Some(duration.to_owned());
    row.date_added = Some(date_added.to_owned());
    row
}
