//! Writes a deterministic synthetic catalog as `sample_titles.csv` and
//! `sample_titles.parquet`, including the messy values real exports contain
//! (missing countries, unparseable dates, durations without a number).

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 600;

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const COUNTRIES: [&str; 9] = [
    "United States",
    "India",
    "United Kingdom",
    "Japan",
    "South Korea",
    "Canada",
    "France",
    "Spain",
    "Mexico",
];

const MOVIE_GENRES: [&str; 8] = [
    "Dramas",
    "Comedies",
    "Documentaries",
    "Action & Adventure",
    "International Movies",
    "Thrillers",
    "Horror Movies",
    "Romantic Movies",
];

const SHOW_GENRES: [&str; 7] = [
    "TV Dramas",
    "TV Comedies",
    "Docuseries",
    "International TV Shows",
    "Kids' TV",
    "Crime TV Shows",
    "Reality TV",
];

const RATINGS: [&str; 6] = ["TV-MA", "TV-14", "R", "PG-13", "TV-PG", "PG"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn chance(&mut self, percent: usize) -> bool {
        self.below(100) < percent
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// Up to `max` distinct items joined with `", "`.
    fn pick_list(&mut self, items: &[&str], max: usize) -> String {
        let count = 1 + self.below(max);
        let mut chosen: Vec<&str> = Vec::with_capacity(count);
        while chosen.len() < count {
            let item = self.pick(items);
            if !chosen.contains(&item) {
                chosen.push(item);
            }
        }
        chosen.join(", ")
    }
}

#[derive(Debug, Serialize)]
struct TitleRow {
    show_id: String,
    #[serde(rename = "type")]
    kind: String,
    title: String,
    director: Option<String>,
    cast: Option<String>,
    country: Option<String>,
    date_added: Option<String>,
    release_year: Option<i64>,
    rating: Option<String>,
    duration: Option<String>,
    listed_in: Option<String>,
    description: String,
}

fn generate_row(i: usize, rng: &mut SimpleRng) -> TitleRow {
    let is_movie = rng.chance(70);
    let release_year = 1990 + rng.below(32) as i64;

    let duration = if rng.chance(3) {
        // Unit present, number missing.
        Some(if is_movie { "min" } else { "Seasons" }.to_string())
    } else if is_movie {
        Some(format!("{} min", 60 + rng.below(120)))
    } else {
        match 1 + rng.below(6) {
            1 => Some("1 Season".to_string()),
            n => Some(format!("{n} Seasons")),
        }
    };

    let date_added = if rng.chance(5) {
        Some("unknown".to_string())
    } else {
        let year = (release_year + rng.below(4) as i64).min(2021);
        Some(format!(
            "{} {}, {year}",
            rng.pick(&MONTHS),
            1 + rng.below(28)
        ))
    };

    let genres: &[&str] = if is_movie { &MOVIE_GENRES } else { &SHOW_GENRES };

    TitleRow {
        show_id: format!("s{}", i + 1),
        kind: if is_movie { "Movie" } else { "TV Show" }.to_string(),
        title: format!("Title {:04}", i + 1),
        director: rng.chance(60).then(|| format!("Director {}", rng.below(150))),
        cast: rng.chance(80).then(|| format!("Actor {}, Actor {}", rng.below(300), rng.below(300))),
        country: (!rng.chance(10)).then(|| rng.pick_list(&COUNTRIES, 3)),
        date_added,
        release_year: (!rng.chance(2)).then_some(release_year),
        rating: (!rng.chance(3)).then(|| rng.pick(&RATINGS).to_string()),
        duration,
        listed_in: (!rng.chance(2)).then(|| rng.pick_list(genres, 3)),
        description: format!("Synthetic catalog entry number {}.", i + 1),
    }
}

fn write_csv(rows: &[TitleRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn string_column<'a>(rows: &'a [TitleRow], get: impl Fn(&'a TitleRow) -> Option<&'a str>) -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(get).collect::<Vec<_>>()))
}

fn write_parquet(rows: &[TitleRow], path: &str) -> Result<()> {
    let text_fields = [
        "show_id", "type", "title", "director", "cast", "country", "date_added", "rating",
        "duration", "listed_in", "description",
    ];
    let mut fields: Vec<Field> = text_fields
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, true))
        .collect();
    fields.push(Field::new("release_year", DataType::Int64, true));
    let schema = Arc::new(Schema::new(fields));

    let columns: Vec<ArrayRef> = vec![
        string_column(rows, |r| Some(r.show_id.as_str())),
        string_column(rows, |r| Some(r.kind.as_str())),
        string_column(rows, |r| Some(r.title.as_str())),
        string_column(rows, |r| r.director.as_deref()),
        string_column(rows, |r| r.cast.as_deref()),
        string_column(rows, |r| r.country.as_deref()),
        string_column(rows, |r| r.date_added.as_deref()),
        string_column(rows, |r| r.rating.as_deref()),
        string_column(rows, |r| r.duration.as_deref()),
        string_column(rows, |r| r.listed_in.as_deref()),
        string_column(rows, |r| Some(r.description.as_str())),
        Arc::new(Int64Array::from(
            rows.iter().map(|r| r.release_year).collect::<Vec<_>>(),
        )),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<TitleRow> = (0..ROWS).map(|i| generate_row(i, &mut rng)).collect();

    write_csv(&rows, "sample_titles.csv")?;
    write_parquet(&rows, "sample_titles.parquet")?;

    println!("Wrote {} titles to sample_titles.csv and sample_titles.parquet", rows.len());
    println!("Run with CATALOG_DATA_URL= CATALOG_DATA_PATH=sample_titles.csv to use them.");
    Ok(())
}
