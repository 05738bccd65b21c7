use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::serve;
use axum::{routing::post, Json, Router};
use rand::Rng;
use tokio::net::TcpListener;
use tokio::time::{sleep, Duration};
use tracing::info;
use uuid::Uuid;

use crate::openrtb::request::BidRequest;
use crate::openrtb::response::{Bid, BidResponse, SeatBid};

/// 模拟 RX 竞价接口
///
/// 只接受单 imp 请求，多 imp 返回 400；
/// 约 20% 返回 204 无填充，约 10% 返回 price 为 0 的不出价，其余按 banner 出价。
async fn handle_rx_bid(Json(request): Json<BidRequest>) -> Response {
    info!(
        "Mock RX received BidRequest: id={}, imp_count={}",
        request.id,
        request.imp.len()
    );

    if request.imp.len() != 1 {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let imp = &request.imp[0];

    // 模拟上游处理延迟（20 ~ 120 毫秒）
    let delay_ms = rand::thread_rng().gen_range(20..120);
    sleep(Duration::from_millis(delay_ms)).await;

    let roll: f64 = rand::thread_rng().gen();
    if roll < 0.2 {
        return StatusCode::NO_CONTENT.into_response();
    }

    let bidfloor = imp.bidfloor.unwrap_or(0.01);
    let price = if roll < 0.3 {
        0.0
    } else {
        bidfloor * rand::thread_rng().gen_range(1.0..2.0)
    };

    let (w, h) = imp
        .banner
        .as_ref()
        .and_then(|banner| {
            banner
                .format
                .iter()
                .find(|f| f.w > 0 && f.h > 0)
                .map(|f| (f.w, f.h))
                .or(banner.w.zip(banner.h))
        })
        .unwrap_or((300, 250));

    let bid_id = Uuid::new_v4().to_string();
    let bid = Bid {
        adm: Some(format!(
            "<html><body>Mock RX Banner Ad<br/><img src=\"http://rx-tracker.local/impression?bid={bid_id}\" style=\"display:none;\" /></body></html>",
            bid_id = bid_id
        )),
        id: bid_id,
        impid: imp.id.clone(),
        price,
        crid: Some("mock-crid".to_string()),
        w: Some(w),
        h: Some(h),
        ..Default::default()
    };

    Json(BidResponse {
        id: request.id.clone(),
        seatbid: vec![SeatBid {
            bid: vec![bid],
            seat: Some("mock_rx_seat".to_string()),
            group: Some(0),
        }],
        bidid: None,
        cur: Some("USD".to_string()),
        customdata: None,
        nbr: None,
    })
    .into_response()
}

pub fn mock_router() -> Router {
    Router::new().route("/bid", post(handle_rx_bid))
}

/// 启动 Mock RX 服务，路由为 `/bid`
pub async fn start_mock_dsp_server(port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Mock RX running at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    serve(listener, mock_router()).await
}
