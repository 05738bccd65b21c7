use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{error, info};

use crate::bidding::engine::process_bid_request;
use crate::openrtb::request::BidRequest;
use crate::openrtb::response::BidResponse;
use crate::AppState;

/// **处理 OpenRTB 竞价请求**
pub async fn handle_openrtb_request(
    State(state): State<Arc<AppState>>,
    Json(bid_request): Json<BidRequest>,
) -> (StatusCode, Json<BidResponse>) {
    let outcome = process_bid_request(state.bidder.as_ref(), &state.dsp_client, &bid_request).await;
    let error_count = outcome.errors.len();

    match outcome.into_bid_response(&bid_request.id, state.bidder.name()) {
        Some(response) => {
            info!(
                request_id = %response.id,
                bid_count = response.seatbid.iter().map(|s| s.bid.len()).sum::<usize>(),
                error_count,
                "adapter_inquiry_success"
            );
            (StatusCode::OK, Json(response))
        }
        None => {
            error!(request_id = %bid_request.id, error_count, "adapter_inquiry_failed");
            (
                StatusCode::NO_CONTENT, // **204 - 无广告可填充**
                Json(BidResponse {
                    id: bid_request.id.clone(),
                    seatbid: vec![],
                    bidid: None,
                    cur: Some("USD".to_string()),
                    customdata: None,
                    nbr: Some(3), // `3` 表示 "无匹配广告（未填充）"
                }),
            )
        }
    }
}
