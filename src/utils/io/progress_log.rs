// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Periodic progress lines for long-running loops.
//!
//! Logs at most once every [`UPDATE_FREQUENCY`], with elapsed time and an
//! estimate of the time left, under the `rln_migrate::progress` target.

use humantime::format_duration;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

const UPDATE_FREQUENCY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone)]
struct WithProgress {
    completed_items: u64,
    frequency: Duration,
    start: Instant,
    last_logged: Instant,
    message: String,
    total_items: u64,
}

impl WithProgress {
    fn new(message: &str, total_items: u64) -> Self {
        let now = Instant::now();
        Self {
            completed_items: 0,
            frequency: UPDATE_FREQUENCY,
            start: now,
            last_logged: now,
            message: message.into(),
            total_items,
        }
    }

    fn set(&mut self, value: u64) {
        self.completed_items = value;

        self.emit_log_if_required();
    }

    fn emit_log_if_required(&mut self) {
        let now = Instant::now();
        if (now - self.last_logged) > self.frequency {
            tracing::info!(target: "rln_migrate::progress", "{}", self.line(now));
            self.last_logged = now;
        }
    }

    fn line(&self, now: Instant) -> String {
        let elapsed = now - self.start;
        let elapsed_duration = format_duration(Duration::from_secs(elapsed.as_secs()));
        let remaining = self.total_items.saturating_sub(self.completed_items);
        let eta = match self.completed_items {
            0 => "unknown".to_owned(),
            done => {
                let per_item = elapsed.as_secs_f64() / done as f64;
                let eta_secs = (remaining as f64 * per_item).round();
                format_duration(Duration::from_secs_f64(eta_secs)).to_string()
            }
        };
        format!(
            "{} {}/{} (elapsed: {}, eta: {})",
            self.message, self.completed_items, self.total_items, elapsed_duration, eta
        )
    }

    fn finish(&self) {
        tracing::debug!(
            target: "rln_migrate::progress",
            "{} finished {} items in {}",
            self.message,
            self.completed_items,
            format_duration(Duration::from_secs(self.start.elapsed().as_secs()))
        );
    }
}

#[derive(Debug, Clone)]
pub struct ProgressLog {
    progress: Arc<Mutex<WithProgress>>,
}

impl ProgressLog {
    pub fn new(message: &str, total_items: u64) -> Self {
        ProgressLog {
            progress: Arc::new(Mutex::new(WithProgress::new(message, total_items))),
        }
    }

    pub fn set(&self, value: u64) {
        self.progress.lock().set(value);
    }

    pub fn finish(&self) {
        self.progress.lock().finish()
    }
}
