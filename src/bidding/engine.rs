use tracing::{info, warn};

use crate::adapters::{Bidder, TypedBid};
use crate::bidding::dsp_client::DspClient;
use crate::errors::AdapterError;
use crate::logging::adapter_log::AdapterLog;
use crate::openrtb::request::BidRequest;
use crate::openrtb::response::{BidResponse, SeatBid};

/// 一次竞价的汇总结果：出价与错误分开收集，部分失败不影响其它 imp
#[derive(Debug, Default)]
pub struct AuctionOutcome {
    pub bids: Vec<TypedBid>,
    pub errors: Vec<AdapterError>,
}

impl AuctionOutcome {
    /// 转成对外返回的 OpenRTB 响应，没有出价时返回 None
    pub fn into_bid_response(self, request_id: &str, seat: &str) -> Option<BidResponse> {
        if self.bids.is_empty() {
            return None;
        }
        Some(BidResponse {
            id: request_id.to_string(),
            seatbid: vec![SeatBid {
                bid: self.bids.into_iter().map(|typed| typed.bid).collect(),
                seat: Some(seat.to_string()),
                group: Some(0),
            }],
            bidid: None,
            cur: Some("USD".to_string()),
            customdata: None,
            nbr: None,
        })
    }
}

/// 处理竞价请求
///
/// make_requests 拆分 → 并发请求上游 → 每个返回单独 make_bids → 合并。
/// 不做排序、不缓存、不重试。
pub async fn process_bid_request(
    bidder: &dyn Bidder,
    client: &DspClient,
    bid_request: &BidRequest,
) -> AuctionOutcome {
    let mut adapter_log = AdapterLog::new(bidder.name(), &bid_request.id, bid_request.imp.len());
    let mut outcome = AuctionOutcome::default();

    let (requests, errors) = bidder.make_requests(bid_request);
    for e in &errors {
        adapter_log.add_error(e);
    }
    outcome.errors.extend(errors);

    if requests.is_empty() {
        info!(request_id = %bid_request.id, bidder = bidder.name(), "no outbound requests built");
    }

    for exchange in client.fetch_all(requests).await {
        match exchange.response {
            Ok(response) => {
                let (bids, errors) = bidder.make_bids(bid_request, &exchange.request, &response);
                adapter_log.add_call(Some(response.status_code), bids.len(), exchange.elapsed_ms);
                for e in &errors {
                    adapter_log.add_error(e);
                }
                outcome.bids.extend(bids);
                outcome.errors.extend(errors);
            }
            Err(e) => {
                adapter_log.add_call(None, 0, exchange.elapsed_ms);
                adapter_log.add_error(&e);
                outcome.errors.push(e);
            }
        }
    }

    if !outcome.errors.is_empty() {
        warn!(
            request_id = %bid_request.id,
            error_count = outcome.errors.len(),
            bid_count = outcome.bids.len(),
            "auction finished with errors"
        );
    }
    adapter_log.emit();

    outcome
}
