use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, Request};
use tokio::sync::watch;
use tokio::time::Instant;

use crate::config::LoadPlan;
use crate::error::RequestError;
use crate::metrics::RequestResult;

/// Sends one request per job index using the shared client.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: Client,
    plan: Arc<LoadPlan>,
}

impl RequestExecutor {
    #[must_use]
    pub const fn new(client: Client, plan: Arc<LoadPlan>) -> Self {
        Self { client, plan }
    }

    /// Render, send, and drain the request for `index`.
    ///
    /// Never fails: every outcome, including cancellation, becomes a
    /// [`RequestResult`]. The duration covers sending the request until the
    /// response head arrives; the body is drained afterwards so the
    /// connection can be reused.
    pub async fn execute(&self, index: u64, cancel: &mut watch::Receiver<bool>) -> RequestResult {
        let request = match self.build_request(index) {
            Ok(request) => request,
            Err(err) => {
                return RequestResult::failure(
                    Duration::ZERO,
                    RequestError::BuildRequest { source: err },
                );
            }
        };

        let start = Instant::now();
        let sent = tokio::select! {
            biased;
            () = cancelled(cancel) => Err(RequestError::Cancelled),
            response = self.client.execute(request) => response.map_err(RequestError::from_send),
        };
        let duration = start.elapsed();
        let response = match sent {
            Ok(response) => response,
            Err(err) => return RequestResult::failure(duration, err),
        };

        let status = response.status().as_u16();
        let drained = tokio::select! {
            biased;
            () = cancelled(cancel) => Err(RequestError::Cancelled),
            bytes = drain_response_body(response) => bytes.map_err(|err| {
                if err.is_timeout() {
                    RequestError::Timeout { source: err }
                } else {
                    RequestError::ReadBody { source: err }
                }
            }),
        };

        match drained {
            Ok(bytes) => RequestResult::success(status, duration, bytes),
            Err(err) => RequestResult::failure(duration, err),
        }
    }

    fn build_request(&self, index: u64) -> Result<Request, reqwest::Error> {
        let url = self.plan.url.render(index);
        let mut builder = self
            .client
            .request(self.plan.method.to_reqwest(), &*url);
        for (key, value) in &self.plan.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if self.plan.sends_body() {
            builder = builder.body(self.plan.body.render(index).into_owned());
        }
        builder.build()
    }
}

/// Resolves once cancellation is signalled; pends forever if the signal can
/// no longer fire.
pub(super) async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
