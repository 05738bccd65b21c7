pub mod dsp_client;
pub mod engine;
