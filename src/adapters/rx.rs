// src/adapters/rx.rs

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use tracing::{debug, warn};

use crate::adapters::{BidType, Bidder, RequestData, ResponseData, TypedBid};
use crate::errors::AdapterError;
use crate::openrtb::ext::{ExtImpBidder, ExtImpRx};
use crate::openrtb::request::{BidRequest, Imp};
use crate::openrtb::response::BidResponse;

const STATUS_OK: u16 = 200;
const STATUS_NO_CONTENT: u16 = 204;
const STATUS_BAD_REQUEST: u16 = 400;

/// RX 适配器
///
/// 上游只接受单 imp 请求，所以每个 imp 单独发一次 POST；
/// 返回的出价一律按 banner 处理。
#[derive(Debug, Clone)]
pub struct RxAdapter {
    endpoint: String,
    headers: HeaderMap,
}

impl RxAdapter {
    pub fn new(endpoint: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=utf-8"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Self {
            endpoint: endpoint.to_string(),
            headers,
        }
    }

    /// 两段式解析 imp.ext：先取出通用 `bidder` 外层，再解析 RX 参数
    fn parse_imp_ext(imp: &Imp) -> Result<ExtImpRx, AdapterError> {
        let raw = imp.ext.clone().ok_or_else(|| AdapterError::BadInput {
            message: format!("imp {}: missing ext", imp.id),
        })?;
        let wrapper: ExtImpBidder =
            serde_json::from_value(raw).map_err(|e| AdapterError::BadInput {
                message: e.to_string(),
            })?;
        // `"bidder": null` 视为未配置参数
        let rx_ext: Option<ExtImpRx> =
            serde_json::from_value(wrapper.bidder).map_err(|e| AdapterError::BadInput {
                message: e.to_string(),
            })?;
        Ok(rx_ext.unwrap_or_default())
    }
}

impl Bidder for RxAdapter {
    fn name(&self) -> &'static str {
        "rx"
    }

    fn make_requests(&self, request: &BidRequest) -> (Vec<RequestData>, Vec<AdapterError>) {
        let mut errs = Vec::new();
        let mut requests = Vec::with_capacity(request.imp.len());
        // 除 imp 外的字段原样透传
        let mut single = BidRequest {
            imp: Vec::with_capacity(1),
            ..request.clone()
        };

        for imp in &request.imp {
            let rx_ext = match Self::parse_imp_ext(imp) {
                Ok(ext) => ext,
                Err(e) => {
                    warn!(
                        request_id = %request.id,
                        imp_id = %imp.id,
                        error = %e,
                        "skipping imp with invalid ext"
                    );
                    errs.push(e);
                    continue;
                }
            };
            debug!(
                request_id = %request.id,
                imp_id = %imp.id,
                adspot_id = rx_ext.adspot_id,
                "building rx request"
            );

            single.imp = vec![imp.clone()];
            let body = match serde_json::to_vec(&single) {
                Ok(body) => body,
                // 序列化失败说明整个请求有问题，丢弃已生成的请求
                Err(e) => {
                    return (
                        Vec::new(),
                        vec![AdapterError::Serialization {
                            message: e.to_string(),
                        }],
                    )
                }
            };

            requests.push(RequestData {
                method: Method::POST,
                uri: self.endpoint.clone(),
                body,
                headers: self.headers.clone(),
            });
        }

        (requests, errs)
    }

    fn make_bids(
        &self,
        _internal_request: &BidRequest,
        external_request: &RequestData,
        response: &ResponseData,
    ) -> (Vec<TypedBid>, Vec<AdapterError>) {
        match response.status_code {
            STATUS_NO_CONTENT => return (Vec::new(), Vec::new()),
            STATUS_BAD_REQUEST => {
                return (
                    Vec::new(),
                    vec![AdapterError::bad_status_input(response.status_code)],
                )
            }
            STATUS_OK => {}
            status => return (Vec::new(), vec![AdapterError::UnexpectedStatus { status }]),
        }

        let bid_resp: BidResponse = match serde_json::from_slice(&response.body) {
            Ok(resp) => resp,
            Err(e) => {
                return (
                    Vec::new(),
                    vec![AdapterError::BadServerResponse {
                        message: e.to_string(),
                    }],
                )
            }
        };

        // 出站请求体必须仍是合法的 BidRequest
        if let Err(e) = serde_json::from_slice::<BidRequest>(&external_request.body) {
            return (
                Vec::new(),
                vec![AdapterError::InvalidRequestBody {
                    message: e.to_string(),
                }],
            );
        }

        let bids = bid_resp
            .seatbid
            .into_iter()
            .flat_map(|seatbid| seatbid.bid)
            .filter(|bid| {
                // price 为 0 表示该 seat 明确不出价
                let keep = bid.price > 0.0;
                if !keep {
                    debug!(bid_id = %bid.id, impid = %bid.impid, "dropping zero-price bid");
                }
                keep
            })
            .map(|bid| TypedBid {
                bid,
                bid_type: BidType::Banner,
            })
            .collect();

        (bids, Vec::new())
    }
}
