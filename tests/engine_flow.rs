use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::post, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use rust_adx_rx::adapters::rx::RxAdapter;
use rust_adx_rx::adapters::{BidType, Bidder};
use rust_adx_rx::bidding::dsp_client::DspClient;
use rust_adx_rx::bidding::engine::process_bid_request;
use rust_adx_rx::errors::{AdapterError, ErrorKind};
use rust_adx_rx::openrtb::request::{BidRequest, Imp};

/// 按 imp id 返回固定结果的上游桩
async fn stub_bid(Json(request): Json<BidRequest>) -> Response {
    if request.imp.len() != 1 {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let imp_id = request.imp[0].id.clone();
    let price = match imp_id.as_str() {
        "fill" => 1.25,
        "zero" => 0.0,
        "nofill" => return StatusCode::NO_CONTENT.into_response(),
        _ => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };
    Json(json!({
        "id": request.id,
        "seatbid": [{
            "bid": [{
                "id": format!("bid-{}", imp_id),
                "impid": imp_id,
                "price": price,
                "adm": "<html></html>"
            }],
            "seat": "stub"
        }]
    }))
    .into_response()
}

/// 先回 200 响应头，响应体迟迟不发
async fn stalled_body() -> Response {
    let body = futures::stream::once(async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok::<_, std::io::Error>("{}")
    });
    Response::new(Body::from_stream(body))
}

async fn spawn_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let app = Router::new()
            .route("/bid", post(stub_bid))
            .route("/slow", post(stalled_body));
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/bid", addr)
}

fn imp(id: &str) -> Imp {
    Imp {
        id: id.to_string(),
        ext: Some(json!({"bidder": {"adspot_id": 1}})),
        ..Default::default()
    }
}

#[tokio::test]
async fn fan_out_and_merge() {
    let endpoint = spawn_stub().await;
    let adapter = RxAdapter::new(&endpoint);
    let client = DspClient::new(2_000);

    let mut bad = imp("bad-ext");
    bad.ext = Some(json!({"nobidder": true}));
    let request = BidRequest {
        id: "flow-1".to_string(),
        imp: vec![imp("fill"), imp("zero"), imp("nofill"), imp("broken"), bad],
        ..Default::default()
    };

    let outcome = process_bid_request(&adapter, &client, &request).await;

    assert_eq!(outcome.bids.len(), 1);
    assert_eq!(outcome.bids[0].bid.id, "bid-fill");
    assert_eq!(outcome.bids[0].bid.impid, "fill");
    assert_eq!(outcome.bids[0].bid_type, BidType::Banner);

    assert_eq!(outcome.errors.len(), 2);
    assert!(outcome
        .errors
        .iter()
        .any(|e| e.kind() == ErrorKind::InputValidation));
    assert!(outcome
        .errors
        .contains(&AdapterError::UnexpectedStatus { status: 500 }));

    let response = outcome.into_bid_response(&request.id, "rx").unwrap();
    assert_eq!(response.id, "flow-1");
    assert_eq!(response.seatbid[0].bid.len(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let adapter = RxAdapter::new(&format!("http://{}/bid", addr));
    let client = DspClient::new(2_000);
    let request = BidRequest {
        id: "flow-2".to_string(),
        imp: vec![imp("fill")],
        ..Default::default()
    };

    let outcome = process_bid_request(&adapter, &client, &request).await;
    assert!(outcome.bids.is_empty());
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].kind(), ErrorKind::Generic);
}

#[tokio::test]
async fn stalled_body_hits_the_deadline() {
    let endpoint = spawn_stub().await.replace("/bid", "/slow");
    let adapter = RxAdapter::new(&endpoint);
    let client = DspClient::new(200);
    let request = BidRequest {
        id: "flow-3".to_string(),
        imp: vec![imp("fill")],
        ..Default::default()
    };
    let (reqs, _) = adapter.make_requests(&request);

    let start = Instant::now();
    let result = client.execute(&reqs[0]).await;
    assert_eq!(result, Err(AdapterError::Timeout { millis: 200 }));
    assert!(start.elapsed() < Duration::from_secs(2));
}
