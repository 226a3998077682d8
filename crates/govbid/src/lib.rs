pub mod config;
pub mod error;
pub mod llm;
pub mod storage;
pub mod telemetry;
pub mod workflows;
