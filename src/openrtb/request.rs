use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// OpenRTB BidRequest 结构体
///
/// 适配器只关心 `id` 与 `imp`，其余对象字段（site/app/device/user 等）
/// 以 `Value` 原样保存，拆分单 imp 请求时不做任何修改直接透传。
/// 未列出的字段（bapp 等）收进 `extra`，序列化时原样写回。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BidRequest {
    pub id: String,

    /// 广告展示请求列表
    #[serde(default)]
    pub imp: Vec<Imp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regs: Option<Value>,

    // 其它简单字段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmax: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wseat: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bseat: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allimps: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cur: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wlang: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcat: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badv: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 单个广告位（imp）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Imp {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmp: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidfloor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidfloorcur: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<i32>,

    /// 扩展字段，形如 `{"bidder": {"adspot_id": 1}}`，由各 bidder 自行解析
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,

    /// instl、displaymanager 等未建模字段
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Banner 描述
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Banner {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub format: Vec<Format>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Banner 尺寸
///
/// 只给出 wratio/hratio/wmin 的 format 也合法，此时 w/h 为 0，不会写回。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Format {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub w: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub h: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Format {
    pub fn new(w: i32, h: i32) -> Self {
        Self {
            w,
            h,
            extra: Map::new(),
        }
    }
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}
