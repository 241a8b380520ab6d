//! Progress bar display for package materialization

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display while packages are located or built in the cache
pub struct ProgressDisplay {
    package_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with total package count
    pub fn new(total_packages: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        let package_pb = ProgressBar::new(total_packages);
        package_pb.set_style(style);

        Self { package_pb }
    }

    /// Hidden display, for non-interactive runs
    pub fn hidden() -> Self {
        Self {
            package_pb: ProgressBar::hidden(),
        }
    }

    /// Update to show current package being materialized
    pub fn update_package(&self, reference: &str, current: usize, total: usize) {
        self.package_pb
            .set_message(format!("({current}/{total}) {reference}"));
    }

    /// Increment package progress
    pub fn inc_package(&self) {
        self.package_pb.inc(1);
    }

    pub fn finish(&self) {
        self.package_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.package_pb.abandon();
    }
}
