use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};

use crate::chart::{self, ChartSet};
use crate::data::filter::Filters;
use crate::data::model::PreparedDataset;

// ---------------------------------------------------------------------------
// Background recomputation with latest-wins semantics
// ---------------------------------------------------------------------------

struct Request {
    generation: u64,
    filters: Filters,
}

struct Outcome {
    generation: u64,
    /// `None` when the computation panicked.
    charts: Option<ChartSet>,
}

/// What [`Recomputer::poll`] hands back to the UI.
#[derive(Debug)]
pub enum Delivery {
    Charts(ChartSet),
    Failed,
}

/// Runs chart recomputation on a dedicated thread.
///
/// Each submission gets a new generation. The worker skips queued requests
/// that have been superseded, and [`poll`](Self::poll) drops any outcome
/// that is not for the newest generation, so a slow stale computation never
/// replaces a fresher chart set.
pub struct Recomputer {
    requests: Sender<Request>,
    outcomes: Receiver<Outcome>,
    latest: u64,
    settled: u64,
}

impl Recomputer {
    /// Start the worker. `notify` is called after each finished computation
    /// (the UI uses it to request a repaint).
    pub fn spawn<F>(dataset: Arc<PreparedDataset>, notify: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<Request>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<Outcome>();

        thread::Builder::new()
            .name("chart-recompute".into())
            .spawn(move || worker_loop(&dataset, request_rx, outcome_tx, notify))
            .context("spawning recompute worker")?;

        Ok(Self {
            requests: request_tx,
            outcomes: outcome_rx,
            latest: 0,
            settled: 0,
        })
    }

    /// Queue a recomputation for `filters`, superseding any earlier request.
    pub fn submit(&mut self, filters: Filters) -> u64 {
        self.latest += 1;
        let generation = self.latest;
        if self.requests.send(Request { generation, filters }).is_err() {
            log::error!("Recompute worker has stopped; generation {generation} dropped");
        }
        generation
    }

    /// Whether the newest submission has not produced an outcome yet.
    pub fn is_pending(&self) -> bool {
        self.settled < self.latest
    }

    /// Drain finished work and return the outcome for the newest generation, if ready.
    pub fn poll(&mut self) -> Option<Delivery> {
        let mut delivery = None;
        while let Ok(outcome) = self.outcomes.try_recv() {
            if outcome.generation != self.latest {
                log::debug!(
                    "Discarding stale chart set (generation {}, latest {})",
                    outcome.generation,
                    self.latest
                );
                continue;
            }
            self.settled = outcome.generation;
            delivery = Some(match outcome.charts {
                Some(charts) => Delivery::Charts(charts),
                None => Delivery::Failed,
            });
        }
        delivery
    }
}

fn worker_loop<F>(
    dataset: &PreparedDataset,
    requests: Receiver<Request>,
    outcomes: Sender<Outcome>,
    notify: F,
) where
    F: Fn(),
{
    while let Ok(mut request) = requests.recv() {
        // Only the newest queued request matters.
        while let Ok(newer) = requests.try_recv() {
            log::debug!("Skipping superseded generation {}", request.generation);
            request = newer;
        }

        let charts = panic::catch_unwind(AssertUnwindSafe(|| {
            chart::recompute(dataset, &request.filters)
        }))
        .ok();
        if charts.is_none() {
            log::error!("Chart recomputation panicked for {:?}", request.filters);
        }

        let outcome = Outcome {
            generation: request.generation,
            charts,
        };
        if outcomes.send(outcome).is_err() {
            break;
        }
        notify();
    }
    log::debug!("Recompute worker exiting");
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::data::filter::{CountryFilter, TypeFilter};
    use crate::data::model::{ContentType, YearRange};
    use crate::data::testing::mixed_dataset;

    fn wait_for(recomputer: &mut Recomputer) -> Delivery {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(delivery) = recomputer.poll() {
                return delivery;
            }
            assert!(Instant::now() < deadline, "no chart set delivered");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn delivers_charts_for_a_single_request() {
        let dataset = Arc::new(mixed_dataset());
        let mut recomputer = Recomputer::spawn(dataset.clone(), || {}).unwrap();
        let filters = Filters::defaults(&dataset);

        assert_eq!(recomputer.submit(filters.clone()), 1);
        assert!(recomputer.is_pending());

        match wait_for(&mut recomputer) {
            Delivery::Charts(set) => assert_eq!(set, chart::recompute(&dataset, &filters)),
            Delivery::Failed => panic!("recompute failed"),
        }
        assert!(!recomputer.is_pending());
    }

    #[test]
    fn only_the_latest_submission_is_delivered() {
        let dataset = Arc::new(mixed_dataset());
        let mut recomputer = Recomputer::spawn(dataset.clone(), || {}).unwrap();

        let mut filters = Filters::defaults(&dataset);
        recomputer.submit(filters.clone());
        filters.content_type = TypeFilter::Only(ContentType::Movie);
        recomputer.submit(filters.clone());
        filters.country = CountryFilter::Containing("Canada".into());
        filters.year_range = YearRange::new(2020, 2020);
        let last = recomputer.submit(filters.clone());
        assert_eq!(last, 3);

        match wait_for(&mut recomputer) {
            Delivery::Charts(set) => assert_eq!(set, chart::recompute(&dataset, &filters)),
            Delivery::Failed => panic!("recompute failed"),
        }
        assert!(!recomputer.is_pending());
        assert!(recomputer.poll().is_none());
    }

    #[test]
    fn notifies_after_each_computation() {
        let dataset = Arc::new(mixed_dataset());
        let (tx, rx) = mpsc::channel();
        let mut recomputer = Recomputer::spawn(dataset.clone(), move || {
            let _ = tx.send(());
        })
        .unwrap();

        recomputer.submit(Filters::defaults(&dataset));
        rx.recv_timeout(Duration::from_secs(10))
            .expect("worker should notify");
    }
}
