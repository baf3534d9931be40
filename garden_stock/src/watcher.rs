//! The polling loop
//!
//! Each cycle runs fetch -> normalize -> diff -> (report | idle) -> commit -> sleep.
//! [`StockWatcher::observe`] holds all of the decision logic and does no I/O, so
//! cycles can be driven with synthetic snapshots.

use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::diff::{diff, DiffOutcome};
use crate::model::Snapshot;
use crate::notifier::TelegramNotifier;
use crate::report::render_report;
use crate::stock_api::{FetchedSnapshot, StockApi};

/// What a single cycle decided to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No category has answered yet; nothing recorded, nothing sent
    BaselinePending,
    /// First successful cycle after start; snapshot recorded, nothing sent
    Baseline,
    /// Stock identical to the last cycle
    Unchanged,
    /// Stock changed but no changed item is in stock
    NothingToReport { changed_items: usize },
    /// A report should be delivered
    Report { changed_items: usize, message: String },
}

/// Owns the last known snapshot for the lifetime of the process
pub struct StockWatcher {
    last_known: Snapshot,
    timezone: Tz,
}

impl StockWatcher {
    pub fn new(timezone: Tz) -> Self {
        Self {
            last_known: Snapshot::empty(),
            timezone,
        }
    }

    pub fn last_known(&self) -> &Snapshot {
        &self.last_known
    }

    /// Like [`observe`](Self::observe), but an all-failed fetch never becomes the
    /// baseline. Otherwise a cold-starting API would make the whole stock look new
    /// on the next cycle.
    pub fn observe_fetch(&mut self, fetched: FetchedSnapshot, now: DateTime<Utc>) -> CycleOutcome {
        if self.last_known.is_empty() && fetched.available == 0 {
            return CycleOutcome::BaselinePending;
        }
        self.observe(fetched.snapshot, now)
    }

    /// Diff `current` against the last known snapshot, render a report if anything
    /// qualifies, and commit `current` as the new last known snapshot.
    pub fn observe(&mut self, current: Snapshot, now: DateTime<Utc>) -> CycleOutcome {
        let outcome = match diff(&self.last_known, &current) {
            DiffOutcome::Baseline => CycleOutcome::Baseline,
            DiffOutcome::Changes(changes) if changes.is_empty() => CycleOutcome::Unchanged,
            DiffOutcome::Changes(changes) => {
                for (category, items) in changes.iter() {
                    for change in items {
                        if change.is_new() {
                            log::debug!("{}: new item {}", category, change.name);
                        } else {
                            log::debug!(
                                "{}: {} {:?} -> {:?}",
                                category,
                                change.name,
                                change.previous,
                                change.current
                            );
                        }
                    }
                }

                let local = now.with_timezone(&self.timezone);
                match render_report(&changes, local) {
                    Some(message) => CycleOutcome::Report {
                        changed_items: changes.len(),
                        message,
                    },
                    None => CycleOutcome::NothingToReport {
                        changed_items: changes.len(),
                    },
                }
            }
        };

        self.last_known = current;
        outcome
    }

    /// Run one full cycle against the live collaborators
    pub async fn run_cycle(&mut self, api: &StockApi, notifier: &TelegramNotifier) -> CycleOutcome {
        log::info!("Starting stock check cycle");

        let fetched = api.fetch_snapshot().await;
        log::debug!(
            "Fetched {} items from {} categories",
            fetched.snapshot.item_count(),
            fetched.available
        );

        let outcome = self.observe_fetch(fetched, Utc::now());
        match &outcome {
            CycleOutcome::BaselinePending => {
                log::warn!("No category could be fetched, baseline still pending");
            }
            CycleOutcome::Baseline => {
                log::info!("Recorded baseline stock, no report on first cycle");
            }
            CycleOutcome::Unchanged => {
                log::info!("No stock changes, skipping report");
            }
            CycleOutcome::NothingToReport { changed_items } => {
                log::info!(
                    "{} item(s) changed but none are in stock, no report sent",
                    changed_items
                );
            }
            CycleOutcome::Report {
                changed_items,
                message,
            } => {
                log::info!("{} item(s) changed, sending report", changed_items);
                if !notifier.deliver(message).await {
                    log::warn!("Report dropped; current stock is still recorded");
                }
            }
        }

        outcome
    }

    /// Poll forever, sleeping `interval` between cycles
    pub async fn run(
        &mut self,
        api: &StockApi,
        notifier: &TelegramNotifier,
        interval: Duration,
    ) {
        loop {
            self.run_cycle(api, notifier).await;
            log::info!("Cycle finished, next check in {}s", interval.as_secs());
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use chrono::TimeZone;

    fn watcher() -> StockWatcher {
        StockWatcher::new(chrono_tz::Asia::Jakarta)
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn first_cycle_records_baseline_without_report() {
        let mut watcher = watcher();
        let current = Snapshot::from_pairs(&[
            (Category::Seeds, &[("Carrot", 20), ("Tomato", 4)]),
            (Category::Gear, &[("Trowel", 1)]),
        ]);

        assert_eq!(watcher.observe(current.clone(), at(1)), CycleOutcome::Baseline);
        assert_eq!(watcher.last_known(), &current);
    }

    fn fetched(snapshot: Snapshot, available: usize) -> FetchedSnapshot {
        FetchedSnapshot {
            snapshot,
            available,
        }
    }

    #[test]
    fn failed_startup_fetch_keeps_baseline_pending() {
        let mut watcher = watcher();

        assert_eq!(
            watcher.observe_fetch(fetched(Snapshot::all_empty(), 0), at(1)),
            CycleOutcome::BaselinePending
        );
        assert!(watcher.last_known().is_empty());

        let full = Snapshot::from_pairs(&[
            (Category::Seeds, &[("carrot", 20), ("tomato", 4), ("corn", 2)]),
            (Category::Eggs, &[("common_egg", 3)]),
            (Category::Gear, &[("trowel", 1)]),
        ]);
        assert_eq!(
            watcher.observe_fetch(fetched(full.clone(), 3), at(2)),
            CycleOutcome::Baseline
        );
        assert_eq!(watcher.last_known(), &full);

        assert_eq!(
            watcher.observe_fetch(fetched(full, 3), at(3)),
            CycleOutcome::Unchanged
        );
    }

    #[test]
    fn all_failed_fetch_after_baseline_is_committed() {
        let mut watcher = watcher();
        let stocked = Snapshot::from_pairs(&[(Category::Seeds, &[("carrot", 2)])]);
        watcher.observe_fetch(fetched(stocked, 3), at(1));

        assert_eq!(
            watcher.observe_fetch(fetched(Snapshot::all_empty(), 0), at(2)),
            CycleOutcome::NothingToReport { changed_items: 1 }
        );
        assert_eq!(watcher.last_known(), &Snapshot::all_empty());
    }

    #[test]
    fn identical_snapshot_twice_is_unchanged() {
        let mut watcher = watcher();
        let snapshot = Snapshot::from_pairs(&[(Category::Seeds, &[("Carrot", 3)])]);

        assert_eq!(watcher.observe(snapshot.clone(), at(1)), CycleOutcome::Baseline);
        assert_eq!(watcher.observe(snapshot.clone(), at(2)), CycleOutcome::Unchanged);
        assert_eq!(watcher.observe(snapshot, at(3)), CycleOutcome::Unchanged);
    }

    #[test]
    fn changes_after_baseline_are_reported() {
        let mut watcher = watcher();
        watcher.observe(Snapshot::from_pairs(&[(Category::Seeds, &[("Carrot", 3)])]), at(1));

        let current = Snapshot::from_pairs(&[
            (Category::Seeds, &[("Carrot", 5)]),
            (Category::Eggs, &[("Chicken", 2)]),
        ]);
        match watcher.observe(current.clone(), at(2)) {
            CycleOutcome::Report {
                changed_items,
                message,
            } => {
                assert_eq!(changed_items, 2);
                assert!(message.contains("🌱 *Seeds:*\n- Carrot : 5"));
                assert!(message.contains("🥚 *Eggs:*\n- Chicken : 2"));
                // 02:00 UTC is 09:00 in Jakarta
                assert!(message.contains("_2025-01-15 09:00:00"));
            }
            other => panic!("expected report, got {other:?}"),
        }
        assert_eq!(watcher.last_known(), &current);
    }

    #[test]
    fn sold_out_changes_commit_without_report() {
        let mut watcher = watcher();
        watcher.observe(Snapshot::from_pairs(&[(Category::Gear, &[("Trowel", 2)])]), at(1));

        let current = Snapshot::from_pairs(&[(Category::Gear, &[("Trowel", 0)])]);
        assert_eq!(
            watcher.observe(current.clone(), at(2)),
            CycleOutcome::NothingToReport { changed_items: 1 }
        );
        assert_eq!(watcher.last_known(), &current);
        assert_eq!(watcher.observe(current, at(3)), CycleOutcome::Unchanged);
    }

    #[test]
    fn failed_category_counts_as_empty_and_others_still_report() {
        let mut watcher = watcher();
        watcher.observe(
            Snapshot::from_pairs(&[
                (Category::Seeds, &[("Carrot", 3)]),
                (Category::Eggs, &[("Common Egg", 1)]),
            ]),
            at(1),
        );

        // Eggs timed out this cycle and came back empty
        let mut current = Snapshot::from_pairs(&[(Category::Seeds, &[("Carrot", 8)])]);
        current.insert(Category::Eggs, Default::default());

        match watcher.observe(current, at(2)) {
            CycleOutcome::Report {
                changed_items,
                message,
            } => {
                assert_eq!(changed_items, 2);
                assert!(message.contains("Carrot : 8"));
                assert!(!message.contains("Eggs"));
            }
            other => panic!("expected report, got {other:?}"),
        }
    }
}
