//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Progress reporter for tabrecon operations
#[derive(Debug)]
pub struct ProgressReporter {
    pub load_pb: Option<ProgressBar>,
    pub compare_pb: Option<ProgressBar>,
    pub files_pb: Option<ProgressBar>,
    show_progress: bool,
    start_time: Instant,
}

impl ProgressReporter {
    /// Create progress reporter for dataset validation
    pub fn new_for_validation() -> Self {
        let load_pb = create_spinner("Loading datasets...");

        Self {
            load_pb: Some(load_pb),
            compare_pb: None,
            files_pb: None,
            show_progress: true,
            start_time: Instant::now(),
        }
    }

    /// Create progress reporter for checksum generation
    pub fn new_for_checksums() -> Self {
        Self {
            load_pb: None,
            compare_pb: None,
            files_pb: None,
            show_progress: true,
            start_time: Instant::now(),
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            load_pb: None,
            compare_pb: None,
            files_pb: None,
            show_progress: false,
            start_time: Instant::now(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.show_progress
    }

    /// Update the loading spinner message
    pub fn update_loading(&mut self, message: &str) {
        if let Some(pb) = &self.load_pb {
            pb.set_message(message.to_string());
        }
    }

    /// Finish loading and start the comparison spinner
    pub fn finish_loading(&mut self, message: &str) {
        if let Some(pb) = self.load_pb.take() {
            pb.finish_with_message(message.to_string());
        }
        if self.show_progress && self.compare_pb.is_none() {
            self.compare_pb = Some(create_spinner("Reconciling records..."));
        }
    }

    /// Finish comparison
    pub fn finish_compare(&mut self, message: &str) {
        if let Some(pb) = self.compare_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }

    /// Lazily create the file hashing bar once the file count is known
    pub fn start_files(&mut self, total: u64) {
        if self.show_progress && self.files_pb.is_none() {
            self.files_pb = Some(create_progress_bar(total, "Hashing files"));
        }
    }

    /// Update file hashing progress
    pub fn update_files(&mut self, processed: u64) {
        if let Some(pb) = &self.files_pb {
            pb.set_position(processed);
        }
    }

    /// Finish file hashing
    pub fn finish_files(&mut self, message: &str) {
        if let Some(pb) = self.files_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }

    /// Time since the reporter was created
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Finish all progress bars
    pub fn finish_all(&mut self, message: &str) {
        if let Some(pb) = self.load_pb.take() {
            pb.finish_with_message(message.to_string());
        }
        self.finish_compare(message);
        self.finish_files(message);
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        for pb in [self.load_pb.take(), self.compare_pb.take(), self.files_pb.take()]
            .into_iter()
            .flatten()
        {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar with known total
fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} ({per_sec}) {eta} {msg}")
            .expect("Invalid progress template")
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
