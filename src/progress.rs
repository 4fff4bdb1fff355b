//! Spinner feedback while catalogs are introspected.
//!
//! The schema builder reports every fetch step; `BuildProgress` turns those
//! steps into spinner messages on stderr.

use crate::builder::BuildStep;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A spinner that shows the current schema and fetch step.
pub struct BuildProgress {
    bar: Option<ProgressBar>,
    steps: u64,
}

impl BuildProgress {
    /// Create a spinner, or a silent tracker when `enabled` is false
    pub fn new(enabled: bool) -> Self {
        let bar = enabled.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb.set_message("Connecting...");
            pb
        });
        Self { bar, steps: 0 }
    }

    /// Record a fetch step of the given schema
    pub fn step(&mut self, schema: &str, step: BuildStep<'_>) {
        self.steps += 1;
        if let Some(ref pb) = self.bar {
            pb.set_message(format!("{}: {}", schema, step));
        }
    }

    /// Number of steps seen so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn finish(&self) {
        if let Some(ref pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}

impl Drop for BuildProgress {
    fn drop(&mut self) {
        if let Some(ref pb) = self.bar {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}
