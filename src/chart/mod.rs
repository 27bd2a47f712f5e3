//! Chart specifications and the filter → chart-set recomputation.

mod compute;
pub mod spec;

pub use compute::recompute;
pub use spec::{ChartBody, ChartId, ChartSet, ChartSpec};
