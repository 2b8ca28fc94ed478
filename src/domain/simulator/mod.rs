pub mod random_source;
pub mod random_source_mock;
pub mod simulator;
