// src/lib.rs

use std::sync::Arc;

pub mod adapters;
pub mod api;
pub mod bidding;
pub mod config;
pub mod errors;
pub mod logging;
pub mod mock_dsp;
pub mod openrtb;

use adapters::Bidder;
use bidding::dsp_client::DspClient;

#[derive(Clone)]
pub struct AppState {
    pub bidder: Arc<dyn Bidder>,
    pub dsp_client: DspClient,
}
