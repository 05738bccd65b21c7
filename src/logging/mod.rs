pub mod adapter_log;
pub mod logger;
