use serde::Serialize;

use crate::data::model::ContentType;

// ---------------------------------------------------------------------------
// Chart identity
// ---------------------------------------------------------------------------

/// The five dashboard charts, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    TypeComposition,
    TopGenres,
    AdditionsOverTime,
    DurationTrend,
    CountryProduction,
}

impl ChartId {
    pub const ALL: [ChartId; 5] = [
        ChartId::TypeComposition,
        ChartId::TopGenres,
        ChartId::AdditionsOverTime,
        ChartId::DurationTrend,
        ChartId::CountryProduction,
    ];

    pub fn kind(self) -> ChartKind {
        match self {
            ChartId::TypeComposition => ChartKind::Donut,
            ChartId::TopGenres => ChartKind::HorizontalBar,
            ChartId::AdditionsOverTime => ChartKind::Line,
            ChartId::DurationTrend => ChartKind::FacetedScatter,
            ChartId::CountryProduction => ChartKind::Choropleth,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartId::TypeComposition => "Movies vs. TV Shows",
            ChartId::TopGenres => "Top 10 Genres",
            ChartId::AdditionsOverTime => "Content Added Over Time",
            ChartId::DurationTrend => "Content Duration Trends",
            ChartId::CountryProduction => "Content Production by Country",
        }
    }

    fn index(self) -> usize {
        match self {
            ChartId::TypeComposition => 0,
            ChartId::TopGenres => 1,
            ChartId::AdditionsOverTime => 2,
            ChartId::DurationTrend => 3,
            ChartId::CountryProduction => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Donut,
    HorizontalBar,
    Line,
    FacetedScatter,
    Choropleth,
}

// ---------------------------------------------------------------------------
// Chart specification: kind + data + encoding
// ---------------------------------------------------------------------------

/// A declarative chart: what to draw, independent of how it is rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub kind: ChartKind,
    pub title: String,
    pub body: ChartBody,
}

impl ChartSpec {
    pub fn new(id: ChartId, body: ChartBody) -> Self {
        ChartSpec {
            id,
            kind: id.kind(),
            title: id.title().to_string(),
            body,
        }
    }

    /// Explicit empty state used when the filtered slice has no rows.
    pub fn no_data(id: ChartId) -> Self {
        Self::new(id, ChartBody::NoData)
    }

    pub fn has_data(&self) -> bool {
        !matches!(self.body, ChartBody::NoData)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ChartBody {
    NoData,
    Donut(DonutChart),
    Bars(BarChart),
    Lines(LineChart),
    Scatter(ScatterChart),
    Choropleth(ChoroplethChart),
}

// -- Donut --

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutChart {
    pub slices: Vec<DonutSlice>,
    /// Inner radius as a fraction of the outer radius.
    pub hole: f32,
    pub show_percent: bool,
    pub show_label: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonutSlice {
    pub kind: ContentType,
    pub count: usize,
    /// Named CSS color.
    pub color: String,
}

impl DonutChart {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }

    /// Share of a slice in percent.
    pub fn percent(&self, slice: &DonutSlice) -> f64 {
        match self.total() {
            0 => 0.0,
            total => slice.count as f64 * 100.0 / total as f64,
        }
    }
}

// -- Bars --

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    /// Bars in drawing order: ascending count, the top-ranked category last.
    pub bars: Vec<CategoryCount>,
    pub category_label: String,
    pub value_label: String,
    /// One color per category.
    pub color_by_category: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

// -- Lines --

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverMode {
    Closest,
    XUnified,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub series: Vec<LineSeries>,
    pub x_label: String,
    pub y_label: String,
    pub hover: HoverMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSeries {
    pub kind: ContentType,
    /// `(year, count)` sorted by year.
    pub points: Vec<(i32, usize)>,
}

// -- Faceted scatter --

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    /// One panel per content type, side by side, Movie first.
    pub panels: Vec<ScatterPanel>,
    pub x_label: String,
    pub marker_size: f32,
    pub opacity: f32,
    /// Panels keep independent y axes.
    pub shared_y_axis: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScatterPanel {
    pub kind: ContentType,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScatterPoint {
    pub release_year: i32,
    pub duration: u64,
    /// Hover text.
    pub title: String,
}

// -- Choropleth --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScale {
    Plasma,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethChart {
    /// Counts per country, most productive first.
    pub regions: Vec<CategoryCount>,
    /// How `regions[].label` resolves to a map location.
    pub location_mode: String,
    pub color_scale: ColorScale,
    pub show_frame: bool,
    pub show_coastlines: bool,
}

impl ChoroplethChart {
    pub fn max_count(&self) -> usize {
        self.regions.iter().map(|r| r.count).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// ChartSet – exactly five charts
// ---------------------------------------------------------------------------

/// The full replacement set produced by one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    charts: [ChartSpec; 5],
}

impl ChartSet {
    /// Build a set; the charts are stored in [`ChartId::ALL`] order.
    pub fn new(charts: [ChartSpec; 5]) -> Self {
        let mut charts = charts;
        charts.sort_by_key(|c| c.id.index());
        ChartSet { charts }
    }

    /// Every chart in the empty state, shown before the first result arrives.
    pub fn empty() -> Self {
        ChartSet {
            charts: ChartId::ALL.map(ChartSpec::no_data),
        }
    }

    pub fn get(&self, id: ChartId) -> &ChartSpec {
        &self.charts[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartSpec> {
        self.charts.iter()
    }

    pub fn has_data(&self) -> bool {
        self.iter().any(ChartSpec::has_data)
    }
}
