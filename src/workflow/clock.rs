//! Elapsed-time display for running matches.
//!
//! Purely presentational: the authoritative state is the service's
//! `started_at` and `assignment_status`. The clock reads nothing unless the
//! assignment is active and has a start time.

use chrono::{DateTime, Utc};
use pingpong_wire::Table;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Time since `started_at`. A start time in the future reads as zero.
pub fn elapsed(started_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - started_at).to_std().unwrap_or(Duration::ZERO)
}

/// `MM:SS`, or `H:MM:SS` from one hour on.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Clock reading of a table at `now`.
pub fn reading(table: &Table, now: DateTime<Utc>) -> Option<Duration> {
    if !table.has_active_assignment() {
        return None;
    }
    table.started_at.map(|started| elapsed(started, now))
}

pub fn display(table: &Table, now: DateTime<Utc>) -> Option<String> {
    reading(table, now).map(format_elapsed)
}

/// Wall-clock ticker that drives clock redraws.
pub struct MatchClock {
    period: Duration,
}

impl MatchClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(10)),
        }
    }

    /// Publish the current time every period until `shutdown` is cancelled.
    pub fn spawn(
        self,
        shutdown: CancellationToken,
    ) -> (watch::Receiver<DateTime<Utc>>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(Utc::now());
        let handle = tokio::spawn(async move {
            let mut ticks = interval(self.period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticks.tick() => {
                        if tx.send(Utc::now()).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        (rx, handle)
    }
}
