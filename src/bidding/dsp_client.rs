// src/bidding/dsp_client.rs

use std::time::Instant;

use futures::future::join_all;
use reqwest::Client;
use tokio::task::JoinError;
use tokio::time::{timeout, Duration};
use tracing::warn;

use crate::adapters::{RequestData, ResponseData};
use crate::errors::AdapterError;

/// 一次上游调用的结果
#[derive(Debug)]
pub struct Exchange {
    pub request: RequestData,
    pub response: Result<ResponseData, AdapterError>,
    pub elapsed_ms: u128,
}

/// 负责把适配器生成的请求发出去，不做重试
#[derive(Clone)]
pub struct DspClient {
    client: Client,
    timeout: Duration,
}

impl DspClient {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// 执行单个请求，超时覆盖发送和读取响应体全过程
    pub async fn execute(&self, request: &RequestData) -> Result<ResponseData, AdapterError> {
        match timeout(self.timeout, self.send_and_read(request)).await {
            Ok(result) => result,
            Err(_) => Err(AdapterError::Timeout {
                millis: self.timeout.as_millis() as u64,
            }),
        }
    }

    async fn send_and_read(&self, request: &RequestData) -> Result<ResponseData, AdapterError> {
        let resp = self
            .client
            .request(request.method.clone(), &request.uri)
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()
            .await?;

        let status_code = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        Ok(ResponseData { status_code, body })
    }

    /// 并发执行全部请求，结果顺序与输入一致，每个请求都有对应的 Exchange
    pub async fn fetch_all(&self, requests: Vec<RequestData>) -> Vec<Exchange> {
        let tasks: Vec<_> = requests
            .iter()
            .cloned()
            .map(|request| {
                let client = self.clone();
                tokio::spawn(async move {
                    let start = Instant::now();
                    let response = client.execute(&request).await;
                    (response, start.elapsed().as_millis())
                })
            })
            .collect();

        requests
            .into_iter()
            .zip(join_all(tasks).await)
            .map(|(request, joined)| into_exchange(request, joined))
            .collect()
    }
}

/// 任务被取消或 panic 时也要产出一条错误，保证错误数与请求数对得上
fn into_exchange(
    request: RequestData,
    joined: Result<(Result<ResponseData, AdapterError>, u128), JoinError>,
) -> Exchange {
    let (response, elapsed_ms) = match joined {
        Ok(done) => done,
        Err(e) => (
            Err(AdapterError::Transport {
                message: format!("upstream task aborted: {}", e),
            }),
            0,
        ),
    };
    if let Err(e) = &response {
        warn!(
            uri = %request.uri,
            error = %e,
            elapsed_ms = elapsed_ms as u64,
            "upstream call failed"
        );
    }
    Exchange {
        request,
        response,
        elapsed_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use reqwest::Method;

    fn request_data() -> RequestData {
        RequestData {
            method: Method::POST,
            uri: "http://rx.test/bid".to_string(),
            body: b"{}".to_vec(),
            headers: HeaderMap::new(),
        }
    }

    #[tokio::test]
    async fn panicked_task_still_reports_an_error() {
        let joined = tokio::spawn(async {
            if true {
                panic!("worker died");
            }
            (Ok::<_, AdapterError>(ResponseData::default()), 0u128)
        })
        .await;
        assert!(joined.is_err());

        let exchange = into_exchange(request_data(), joined);
        assert_eq!(exchange.request, request_data());
        assert!(matches!(
            exchange.response,
            Err(AdapterError::Transport { ref message }) if message.contains("aborted")
        ));
    }

    #[tokio::test]
    async fn fetch_all_keeps_one_exchange_per_request() {
        let client = DspClient::new(500);
        let mut unroutable = request_data();
        unroutable.uri = "not a url".to_string();

        let exchanges = client.fetch_all(vec![unroutable.clone(), unroutable]).await;
        assert_eq!(exchanges.len(), 2);
        assert!(exchanges.iter().all(|e| e.response.is_err()));
    }
}
