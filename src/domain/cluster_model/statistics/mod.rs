pub mod snapshot_sink;
pub mod stats_recorder;
