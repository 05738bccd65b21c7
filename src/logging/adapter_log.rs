use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

/// **适配器询价日志**，每次竞价输出一条
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdapterLog {
    pub timestamp: String,         // 记录时间
    pub log_type: String,          // 日志类型，固定为 "adapter_bid_request"
    pub bidder: String,            // 适配器名称
    pub request_id: String,        // OpenRTB `BidRequest.id`
    pub imp_count: usize,          // 原始请求 imp 数
    pub request_count: usize,      // 实际发往上游的请求数
    pub bid_count: usize,          // 最终有效出价数
    pub status: String,            // "success" or "no_fill"
    pub calls: Vec<UpstreamCallLog>,
    pub errors: Vec<String>,
}

/// **单次上游调用日志**
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpstreamCallLog {
    pub status_code: Option<u16>, // 传输失败时为空
    pub bid_count: usize,
    pub elapsed_ms: u128,
}

impl AdapterLog {
    /// **创建询价日志**
    pub fn new(bidder: &str, request_id: &str, imp_count: usize) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            log_type: "adapter_bid_request".to_string(),
            bidder: bidder.to_string(),
            request_id: request_id.to_string(),
            imp_count,
            request_count: 0,
            bid_count: 0,
            status: "no_fill".to_string(),
            calls: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// **添加上游调用记录**
    pub fn add_call(&mut self, status_code: Option<u16>, bid_count: usize, elapsed_ms: u128) {
        self.calls.push(UpstreamCallLog {
            status_code,
            bid_count,
            elapsed_ms,
        });
        self.request_count += 1;
        self.bid_count += bid_count;
        if self.bid_count > 0 {
            self.status = "success".to_string();
        }
    }

    pub fn add_error(&mut self, error: impl ToString) {
        self.errors.push(error.to_string());
    }

    /// 以一条结构化事件输出
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(line) => info!(adapter_log = %line, "adapter inquiry finished"),
            Err(e) => info!(
                request_id = %self.request_id,
                error = %e,
                "failed to encode adapter log"
            ),
        }
    }
}
