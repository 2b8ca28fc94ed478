pub mod ar_executor;
pub mod mixed_executor;
