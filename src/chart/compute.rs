use std::collections::BTreeMap;

use crate::data::counts::value_counts;
use crate::data::filter::{filtered_genre_rows, filtered_indices, Filters};
use crate::data::model::{ContentType, PreparedDataset, Record};

use super::spec::{
    BarChart, CategoryCount, ChartBody, ChartId, ChartSet, ChartSpec, ChoroplethChart,
    ColorScale, DonutChart, DonutSlice, HoverMode, LineChart, LineSeries, ScatterChart,
    ScatterPanel, ScatterPoint,
};

/// How many genres the genre chart shows.
pub const TOP_GENRE_LIMIT: usize = 10;

/// Recompute all five charts for the current filter values.
///
/// Pure and deterministic. Charts whose filtered slice is empty come back
/// in the [`ChartBody::NoData`] state; there is no error path.
pub fn recompute(dataset: &PreparedDataset, filters: &Filters) -> ChartSet {
    let rows: Vec<&Record> = filtered_indices(dataset, filters)
        .into_iter()
        .map(|i| &dataset.records[i])
        .collect();
    let genres: Vec<&str> = filtered_genre_rows(dataset, filters)
        .into_iter()
        .map(|row| row.genre.as_str())
        .collect();

    log::debug!(
        "Recomputing charts for {filters:?}: {} rows, {} genre rows",
        rows.len(),
        genres.len()
    );

    ChartSet::new([
        type_composition(&rows),
        top_genres(&genres),
        additions_over_time(&rows),
        duration_trend(&rows),
        country_production(&rows),
    ])
}

/// Named color of a content type in the donut chart.
fn type_color(kind: ContentType) -> &'static str {
    match kind {
        ContentType::Movie => "blue",
        ContentType::TvShow => "green",
    }
}

/// Untyped records have no slice.
fn type_composition(rows: &[&Record]) -> ChartSpec {
    let id = ChartId::TypeComposition;

    let slices: Vec<DonutSlice> = value_counts(rows.iter().filter_map(|r| r.kind))
        .into_iter()
        .map(|(kind, count)| DonutSlice {
            kind,
            count,
            color: type_color(kind).to_string(),
        })
        .collect();
    if slices.is_empty() {
        return ChartSpec::no_data(id);
    }

    ChartSpec::new(
        id,
        ChartBody::Donut(DonutChart {
            slices,
            hole: 0.3,
            show_percent: true,
            show_label: true,
        }),
    )
}

/// Count of every genre in the filtered exploded view, most frequent first.
fn genre_counts<'a>(genres: &[&'a str]) -> Vec<(&'a str, usize)> {
    value_counts(genres.iter().copied())
}

fn top_genres(genres: &[&str]) -> ChartSpec {
    let id = ChartId::TopGenres;
    if genres.is_empty() {
        return ChartSpec::no_data(id);
    }

    // Reverse the ranking so the bars ascend and the top genre is drawn last.
    let bars = genre_counts(genres)
        .into_iter()
        .take(TOP_GENRE_LIMIT)
        .rev()
        .map(|(genre, count)| CategoryCount {
            label: genre.to_string(),
            count,
        })
        .collect();

    ChartSpec::new(
        id,
        ChartBody::Bars(BarChart {
            bars,
            category_label: "genre".to_string(),
            value_label: "count".to_string(),
            color_by_category: true,
        }),
    )
}

/// One series per type; records need both a type and a year added.
fn additions_over_time(rows: &[&Record]) -> ChartSpec {
    let id = ChartId::AdditionsOverTime;

    let mut per_type: BTreeMap<ContentType, BTreeMap<i32, usize>> = BTreeMap::new();
    for rec in rows {
        if let (Some(kind), Some(year)) = (rec.kind, rec.year_added) {
            *per_type.entry(kind).or_default().entry(year).or_default() += 1;
        }
    }
    if per_type.is_empty() {
        return ChartSpec::no_data(id);
    }

    let series = per_type
        .into_iter()
        .map(|(kind, counts)| LineSeries {
            kind,
            points: counts.into_iter().collect(),
        })
        .collect();

    ChartSpec::new(
        id,
        ChartBody::Lines(LineChart {
            series,
            x_label: "Year".to_string(),
            y_label: "Number of Titles".to_string(),
            hover: HoverMode::XUnified,
        }),
    )
}

fn duration_trend(rows: &[&Record]) -> ChartSpec {
    let id = ChartId::DurationTrend;

    let panels: Vec<ScatterPanel> = ContentType::ALL
        .into_iter()
        .filter_map(|kind| {
            let points: Vec<ScatterPoint> = rows
                .iter()
                .filter(|r| r.kind == Some(kind))
                .filter_map(|r| {
                    Some(ScatterPoint {
                        release_year: r.release_year?,
                        duration: r.duration_num?,
                        title: r.title.clone(),
                    })
                })
                .collect();
            if points.is_empty() {
                return None;
            }
            let y_label = match kind {
                ContentType::Movie => "Minutes",
                ContentType::TvShow => "Seasons",
            };
            Some(ScatterPanel {
                kind,
                y_label: y_label.to_string(),
                points,
            })
        })
        .collect();

    if panels.is_empty() {
        return ChartSpec::no_data(id);
    }

    ChartSpec::new(
        id,
        ChartBody::Scatter(ScatterChart {
            panels,
            x_label: "Release Year".to_string(),
            marker_size: 8.0,
            opacity: 0.6,
            shared_y_axis: false,
        }),
    )
}

fn country_production(rows: &[&Record]) -> ChartSpec {
    let id = ChartId::CountryProduction;
    if rows.is_empty() {
        return ChartSpec::no_data(id);
    }

    // Split every multi-country field, regardless of how the country filter matched.
    let regions = value_counts(rows.iter().flat_map(|r| r.countries()))
        .into_iter()
        .map(|(country, count)| CategoryCount {
            label: country.to_string(),
            count,
        })
        .collect();

    ChartSpec::new(
        id,
        ChartBody::Choropleth(ChoroplethChart {
            regions,
            location_mode: "country names".to_string(),
            color_scale: ColorScale::Plasma,
            show_frame: false,
            show_coastlines: false,
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::data::filter::{CountryFilter, TypeFilter};
    use crate::data::model::YearRange;
    use crate::data::prepare::prepare;
    use crate::data::testing::{mixed_dataset, raw, two_title_dataset};

    fn donut_counts(set: &ChartSet) -> HashMap<ContentType, usize> {
        match &set.get(ChartId::TypeComposition).body {
            ChartBody::Donut(donut) => donut.slices.iter().map(|s| (s.kind, s.count)).collect(),
            other => panic!("expected donut, got {other:?}"),
        }
    }

    fn bar_counts(set: &ChartSet) -> Vec<(String, usize)> {
        match &set.get(ChartId::TopGenres).body {
            ChartBody::Bars(bars) => bars.bars.iter().map(|b| (b.label.clone(), b.count)).collect(),
            other => panic!("expected bars, got {other:?}"),
        }
    }

    fn filters(min: i32, max: i32) -> Filters {
        Filters {
            year_range: YearRange::new(min, max),
            content_type: TypeFilter::All,
            country: CountryFilter::All,
        }
    }

    #[test]
    fn two_title_scenario() {
        let ds = two_title_dataset();
        let set = recompute(&ds, &filters(2019, 2020));

        let donut = donut_counts(&set);
        assert_eq!(donut[&ContentType::Movie], 1);
        assert_eq!(donut[&ContentType::TvShow], 1);

        let bars: HashMap<String, usize> = bar_counts(&set).into_iter().collect();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars["Comedy"], 2);
        assert_eq!(bars["Drama"], 1);
    }

    #[test]
    fn always_five_charts_in_order() {
        let ds = mixed_dataset();
        let set = recompute(&ds, &Filters::defaults(&ds));
        let ids: Vec<ChartId> = set.iter().map(|c| c.id).collect();
        assert_eq!(ids, ChartId::ALL);
        assert!(set.iter().all(ChartSpec::has_data));
    }

    #[test]
    fn recompute_is_deterministic() {
        let ds = mixed_dataset();
        let mut f = Filters::defaults(&ds);
        f.country = CountryFilter::Containing("United States".into());
        assert_eq!(recompute(&ds, &f), recompute(&ds, &f));
    }

    #[test]
    fn narrower_filters_count_a_subset() {
        let ds = mixed_dataset();
        let loose = Filters::defaults(&ds);
        let strict = Filters {
            year_range: YearRange::new(2018, 2020),
            content_type: TypeFilter::Only(ContentType::Movie),
            country: CountryFilter::Containing("United States".into()),
        };

        let loose_rows = filtered_indices(&ds, &loose);
        let strict_rows = filtered_indices(&ds, &strict);
        assert!(strict_rows.iter().all(|i| loose_rows.contains(i)));

        let loose_counts = donut_counts(&recompute(&ds, &loose));
        let strict_counts = donut_counts(&recompute(&ds, &strict));
        for (kind, count) in strict_counts {
            assert!(count <= loose_counts[&kind]);
        }
    }

    #[test]
    fn genre_counts_conserve_exploded_pairs() {
        // More than ten genres so the top-10 cut matters.
        let rows: Vec<_> = (0..14)
            .map(|i| {
                let listed = format!("Genre {i}, Genre {}, Shared", i % 3);
                raw("T", "Movie", Some("2000"), Some("X"), Some(listed.as_str()))
            })
            .collect();
        let ds = prepare(rows);
        let f = Filters::defaults(&ds);

        let pairs = filtered_genre_rows(&ds, &f).len();
        let genres: Vec<&str> = filtered_genre_rows(&ds, &f)
            .into_iter()
            .map(|g| g.genre.as_str())
            .collect();
        let all = genre_counts(&genres);
        assert_eq!(all.iter().map(|(_, c)| c).sum::<usize>(), pairs);
        assert!(all.len() > TOP_GENRE_LIMIT);
        assert_eq!(bar_counts(&recompute(&ds, &f)).len(), TOP_GENRE_LIMIT);
    }

    #[test]
    fn genre_bars_ascend_with_ties_in_reverse_encounter_order() {
        let ds = prepare(vec![
            raw("A", "Movie", Some("2000"), None, Some("Horror, Comedy")),
            raw("B", "Movie", Some("2000"), None, Some("Drama, Comedy")),
            raw("C", "Movie", Some("2000"), None, Some("Action")),
        ]);
        let bars = bar_counts(&recompute(&ds, &Filters::defaults(&ds)));
        // Ranking: Comedy 2, then Horror, Drama, Action tied at 1 in encounter order.
        assert_eq!(
            bars,
            vec![
                ("Action".to_string(), 1),
                ("Drama".to_string(), 1),
                ("Horror".to_string(), 1),
                ("Comedy".to_string(), 2),
            ]
        );
    }

    #[test]
    fn single_year_range_keeps_only_that_year() {
        let ds = mixed_dataset();
        let max = ds.year_bounds.unwrap().max;
        let set = recompute(&ds, &filters(max, max));
        let ChartBody::Scatter(scatter) = &set.get(ChartId::DurationTrend).body else {
            panic!("expected scatter");
        };
        assert!(scatter
            .panels
            .iter()
            .flat_map(|p| &p.points)
            .all(|p| p.release_year == max));
        // "D" (TV, 2020) and "F" (Movie, 2020, no duration number).
        assert_eq!(donut_counts(&set).values().sum::<usize>(), 2);
    }

    #[test]
    fn range_outside_observed_years_gives_no_data_everywhere() {
        let ds = mixed_dataset();
        let set = recompute(&ds, &filters(1900, 1910));
        assert_eq!(set.iter().count(), 5);
        assert!(set.iter().all(|c| c.body == ChartBody::NoData));
    }

    #[test]
    fn additions_group_by_year_added_and_type() {
        let ds = mixed_dataset();
        let set = recompute(&ds, &Filters::defaults(&ds));
        let ChartBody::Lines(lines) = &set.get(ChartId::AdditionsOverTime).body else {
            panic!("expected lines");
        };
        assert_eq!(lines.series.len(), 2);
        assert_eq!(lines.series[0].kind, ContentType::Movie);
        // A: 2018, B: 2019, G: 2019, F: 2020 ("E" has no release year).
        assert_eq!(lines.series[0].points, vec![(2018, 1), (2019, 2), (2020, 1)]);
        // C: 2019; D has an unparseable date and is left out.
        assert_eq!(lines.series[1].kind, ContentType::TvShow);
        assert_eq!(lines.series[1].points, vec![(2019, 1)]);
    }

    #[test]
    fn duration_panels_are_faceted_by_type() {
        let ds = mixed_dataset();
        let set = recompute(&ds, &Filters::defaults(&ds));
        let ChartBody::Scatter(scatter) = &set.get(ChartId::DurationTrend).body else {
            panic!("expected scatter");
        };
        assert_eq!(scatter.opacity, 0.6);
        assert!(!scatter.shared_y_axis);
        let labels: Vec<(ContentType, &str, usize)> = scatter
            .panels
            .iter()
            .map(|p| (p.kind, p.y_label.as_str(), p.points.len()))
            .collect();
        // Movies A, B, G have a duration; F does not.
        assert_eq!(
            labels,
            vec![(ContentType::Movie, "Minutes", 3), (ContentType::TvShow, "Seasons", 2)]
        );
    }

    #[test]
    fn countries_are_split_after_substring_filtering() {
        let ds = mixed_dataset();
        let mut f = Filters::defaults(&ds);
        f.country = CountryFilter::Containing("Canada".into());
        let set = recompute(&ds, &f);
        let ChartBody::Choropleth(map) = &set.get(ChartId::CountryProduction).body else {
            panic!("expected choropleth");
        };
        let regions: Vec<(&str, usize)> =
            map.regions.iter().map(|r| (r.label.as_str(), r.count)).collect();
        assert_eq!(regions, vec![("United States", 1), ("Canada", 1)]);
        assert_eq!(map.color_scale, ColorScale::Plasma);
    }

    #[test]
    fn untyped_rows_count_everywhere_except_type_views() {
        let mut typed = raw("A", "Movie", Some("2019"), Some("India"), Some("Dramas"));
        typed.duration = Some("90 min".into());
        typed.date_added = Some("June 1, 2020".into());
        let mut untyped = raw("B", "", Some("2019"), Some("France"), Some("Dramas, Comedies"));
        untyped.duration = Some("100 min".into());
        untyped.date_added = Some("June 2, 2020".into());
        let ds = prepare(vec![typed, untyped]);

        let set = recompute(&ds, &filters(2019, 2019));
        assert_eq!(bar_counts(&set), vec![("Comedies".to_string(), 1), ("Dramas".to_string(), 2)]);
        let ChartBody::Choropleth(map) = &set.get(ChartId::CountryProduction).body else {
            panic!("expected choropleth");
        };
        let regions: Vec<(&str, usize)> =
            map.regions.iter().map(|r| (r.label.as_str(), r.count)).collect();
        assert_eq!(regions, vec![("India", 1), ("France", 1)]);

        assert_eq!(donut_counts(&set), HashMap::from([(ContentType::Movie, 1)]));
        let ChartBody::Scatter(scatter) = &set.get(ChartId::DurationTrend).body else {
            panic!("expected scatter");
        };
        assert_eq!(scatter.panels.len(), 1);
        assert_eq!(scatter.panels[0].points.len(), 1);
        let ChartBody::Lines(lines) = &set.get(ChartId::AdditionsOverTime).body else {
            panic!("expected lines");
        };
        assert_eq!(lines.series.len(), 1);
        assert_eq!(lines.series[0].points, vec![(2020, 1)]);

        let mut movies = filters(2019, 2019);
        movies.content_type = TypeFilter::Only(ContentType::Movie);
        assert_eq!(bar_counts(&recompute(&ds, &movies)), vec![("Dramas".to_string(), 1)]);
    }

    #[test]
    fn only_untyped_rows_leave_the_donut_empty() {
        let ds = prepare(vec![raw("B", "Podcast", Some("2019"), Some("France"), Some("Talk"))]);
        let set = recompute(&ds, &Filters::defaults(&ds));
        assert!(!set.get(ChartId::TypeComposition).has_data());
        assert!(set.get(ChartId::TopGenres).has_data());
        assert!(set.get(ChartId::CountryProduction).has_data());
    }

    #[test]
    fn type_colors_are_fixed() {
        let ds = mixed_dataset();
        let set = recompute(&ds, &Filters::defaults(&ds));
        let ChartBody::Donut(donut) = &set.get(ChartId::TypeComposition).body else {
            panic!("expected donut");
        };
        for slice in &donut.slices {
            let expected = match slice.kind {
                ContentType::Movie => "blue",
                ContentType::TvShow => "green",
            };
            assert_eq!(slice.color, expected);
        }
        assert_eq!(donut.hole, 0.3);
    }
}
