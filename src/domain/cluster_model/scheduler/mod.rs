pub mod ar_scheduler;
pub mod mixed_scheduler;
