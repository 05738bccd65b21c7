// src/adapters/mod.rs

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::errors::AdapterError;
use crate::openrtb::request::BidRequest;
use crate::openrtb::response::Bid;

pub mod rx;

/// 发往上游 bidder 的一次 HTTP 请求描述，由传输层消费一次
#[derive(Debug, Clone, PartialEq)]
pub struct RequestData {
    pub method: Method,
    pub uri: String,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

/// 上游返回的原始 HTTP 结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseData {
    pub status_code: u16,
    pub body: Vec<u8>,
}

impl ResponseData {
    pub fn new(status_code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }
}

/// 出价的创意类型，RX 只返回 banner
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BidType {
    Banner,
}

/// 归一化后的出价：原始 Bid 加上创意类型
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TypedBid {
    pub bid: Bid,
    pub bid_type: BidType,
}

/// 单个需求方适配器
///
/// 两个方法都是纯函数：不持有可变状态，可以在多个竞价之间并发调用。
/// 成功结果和错误列表分开返回，部分 imp 失败是正常情况。
pub trait Bidder: Send + Sync {
    fn name(&self) -> &'static str;

    /// 把一个竞价请求拆成发往上游的若干 HTTP 请求
    fn make_requests(&self, request: &BidRequest) -> (Vec<RequestData>, Vec<AdapterError>);

    /// 解析一次上游 HTTP 交互，得到归一化出价
    fn make_bids(
        &self,
        internal_request: &BidRequest,
        external_request: &RequestData,
        response: &ResponseData,
    ) -> (Vec<TypedBid>, Vec<AdapterError>);
}
