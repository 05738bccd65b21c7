use serde::{Deserialize, Serialize};
use serde_json::Value;

/// imp.ext 的通用外层：`{"bidder": {...}}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExtImpBidder {
    pub bidder: Value,
}

/// RX 在 `imp.ext.bidder` 下的参数
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtImpRx {
    /// 0 表示未设置
    #[serde(default, skip_serializing_if = "is_zero")]
    pub adspot_id: i64,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}
