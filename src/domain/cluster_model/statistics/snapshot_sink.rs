use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::Result;

/// `tracing` target of the structured snapshot events.
pub const ANALYTICS_TARGET: &str = "analytics";

/// One line of the statistics output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Jobs completed since the start of the run. Always a multiple of the record interval.
    pub completed_jobs: u64,

    /// Running mean of the utilization of departed resources, in percent.
    pub mean_utilization: f64,

    /// Mean wait time over the jobs alive when the snapshot was taken.
    pub mean_wait_time: f64,

    /// Jobs submitted since the start of the run.
    pub jobs_submitted: u64,
}

impl Snapshot {
    /// Fields in output column order, floats with six decimals.
    pub fn to_record(&self) -> [String; 4] {
        [
            self.completed_jobs.to_string(),
            format!("{:.6}", self.mean_utilization),
            format!("{:.6}", self.mean_wait_time),
            self.jobs_submitted.to_string(),
        ]
    }
}

/// Destination of statistics snapshots.
pub trait SnapshotSink: std::fmt::Debug {
    fn record(&mut self, snapshot: &Snapshot) -> Result<()>;
}

/// Appends snapshots as space separated lines to a text file.
///
/// The file is opened in append mode for every record, so it may be removed,
/// rotated or be briefly unavailable between two snapshots.
#[derive(Debug, Clone)]
pub struct FileSnapshotSink {
    path: PathBuf,
}

impl FileSnapshotSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl SnapshotSink for FileSnapshotSink {
    fn record(&mut self, snapshot: &Snapshot) -> Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;

        let mut csv_wtr = csv::WriterBuilder::new().delimiter(b' ').has_headers(false).from_writer(file);
        csv_wtr.write_record(snapshot.to_record())?;
        csv_wtr.flush()?;
        Ok(())
    }
}

/// Keeps snapshots in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotSink {
    snapshots: Arc<RwLock<Vec<Snapshot>>>,
}

impl MemorySnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.snapshots.read().map(|guard| guard.clone()).unwrap_or_default()
    }
}

impl SnapshotSink for MemorySnapshotSink {
    fn record(&mut self, snapshot: &Snapshot) -> Result<()> {
        if let Ok(mut guard) = self.snapshots.write() {
            guard.push(*snapshot);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn snapshot(completed_jobs: u64) -> Snapshot {
        Snapshot { completed_jobs, mean_utilization: 42.5, mean_wait_time: 3.25, jobs_submitted: 1234 }
    }

    #[test]
    fn file_sink_appends_space_separated_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.out.txt");
        let mut sink = FileSnapshotSink::new(&path);

        sink.record(&snapshot(500)).unwrap();
        sink.record(&snapshot(1000)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "500 42.500000 3.250000 1234\n1000 42.500000 3.250000 1234\n");
    }

    #[test]
    fn file_sink_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.out.txt");
        fs::write(&path, "previous run\n").unwrap();

        FileSnapshotSink::new(&path).record(&snapshot(500)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("previous run\n500 "));
    }

    #[test]
    fn file_sink_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSnapshotSink::new(dir.path().join("missing").join("sim.out.txt"));

        assert!(sink.record(&snapshot(500)).is_err());
    }

    #[test]
    fn memory_sink_clones_share_snapshots() {
        let sink = MemorySnapshotSink::new();
        let mut writer = sink.clone();

        writer.record(&snapshot(500)).unwrap();

        assert_eq!(sink.snapshots(), vec![snapshot(500)]);
    }
}
