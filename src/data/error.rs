use std::fmt;

use thiserror::Error;

/// One failed attempt to read rows from a source.
#[derive(Debug, Clone)]
pub struct LoadAttempt {
    pub source: String,
    pub cause: String,
}

impl fmt::Display for LoadAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.cause)
    }
}

/// Fatal: no rows could be obtained from any configured source.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("no data source is configured")]
    NoSources,
    #[error("could not load catalog data from any source ({})", summarize(.attempts))]
    Exhausted { attempts: Vec<LoadAttempt> },
}

fn summarize(attempts: &[LoadAttempt]) -> String {
    attempts
        .iter()
        .map(LoadAttempt::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
