//! Resilient request transport.
//!
//! # Design
//! `Transport::request` performs one logical call as a small state machine:
//!
//! ```text
//! Attempting(0) --2xx--------------------------------> Succeeded
//! Attempting(n) --5xx/429/network, n < max_retries---> sleep(base * 2^n) -> Attempting(n+1)
//! Attempting(n) --other 4xx / timeout / typed error--> Failed
//! Attempting(n) --5xx/429/network, n == max_retries--> Failed
//! ```
//!
//! Each attempt is evaluated by `attempt()`, which returns an explicit
//! `Attempt` tag instead of unwinding; the loop in `execute()` only inspects
//! that tag. Every attempt owns a fresh `CancellationToken` and a single
//! deadline timer. The deadline lives inside the `select!` that awaits the
//! fetch, so it is dropped (disarmed) on every exit path.
//!
//! A timeout ends the whole call with `408 "Request timed out"`; it does not
//! consume the remaining retry budget.
//!
//! The transport holds no mutable state. Concurrent calls share nothing but
//! the fetcher and the timer.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::TransportConfig;
use crate::error::{ApiError, FetchError};
use crate::fetch::{Fetch, ReqwestFetcher};
use crate::http::{merge_headers, HttpRequest, HttpResponse, RequestOptions};
use crate::retry::RetryPolicy;
use crate::timer::{Timer, TokioTimer};

/// Per-attempt timeout used when a call does not set its own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

const STATUS_NO_CONTENT: u16 = 204;

/// Outcome of a single attempt.
#[derive(Debug)]
enum Attempt {
    Settled(HttpResponse),
    Retryable(ApiError),
    Terminal(ApiError),
}

#[derive(Debug, Clone)]
pub struct Transport<F = ReqwestFetcher, T = TokioTimer> {
    fetcher: F,
    timer: T,
    base_url: String,
    retry: RetryPolicy,
    default_timeout: Duration,
}

impl Transport {
    /// A transport over `reqwest` and the tokio clock.
    pub fn new(config: &TransportConfig) -> Self {
        Self::with_parts(config, ReqwestFetcher::new(), TokioTimer)
    }
}

impl<F: Fetch, T: Timer> Transport<F, T> {
    pub fn with_parts(config: &TransportConfig, fetcher: F, timer: T) -> Self {
        Self {
            fetcher,
            timer,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry_policy(),
            default_timeout: config.default_timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Resolve `path` and `options` into the request every attempt will send.
    pub fn build_request(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        if path.is_empty() {
            return Err(ApiError::invalid_request("request path must not be empty"));
        }
        Ok(HttpRequest {
            method: options.method,
            url: format!("{}{path}", self.base_url),
            headers: merge_headers(&options.headers),
            body: options.body.clone(),
        })
    }

    /// Perform one logical call and decode the JSON body as `R`.
    ///
    /// A `204` (or an empty 2xx body) decodes `R` from JSON `null`, so
    /// `()` and `Option<_>` are the natural result types for endpoints that
    /// return nothing.
    pub async fn request<R: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<R, ApiError> {
        let request = self.build_request(path, options)?;
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        let response = self.execute(&request, timeout).await?;
        decode(&response)
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(path, &RequestOptions::default()).await
    }

    /// Run the attempt loop for an already built request.
    ///
    /// Returns the first 2xx response, or the error from the last attempt.
    pub async fn execute(
        &self,
        request: &HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, ApiError> {
        let mut attempt = 0;
        loop {
            match self.attempt(request, timeout, attempt).await {
                Attempt::Settled(response) => return Ok(response),
                Attempt::Retryable(err) if self.retry.has_budget(attempt) => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        method = %request.method,
                        url = %request.url,
                        attempt,
                        status = err.status,
                        delay_ms = delay.as_millis() as u64,
                        "request failed, retrying: {}",
                        err.message
                    );
                    self.timer.sleep(delay).await;
                    attempt += 1;
                }
                Attempt::Retryable(err) | Attempt::Terminal(err) => {
                    tracing::debug!(
                        method = %request.method,
                        url = %request.url,
                        attempt,
                        status = err.status,
                        "request failed: {}",
                        err.message
                    );
                    return Err(err);
                }
            }
        }
    }

    async fn attempt(&self, request: &HttpRequest, timeout: Duration, attempt: u32) -> Attempt {
        tracing::debug!(method = %request.method, url = %request.url, attempt, "sending request");

        let cancel = CancellationToken::new();
        let result = tokio::select! {
            biased;
            result = self.fetcher.fetch(request, cancel.clone()) => result,
            _ = self.timer.sleep(timeout) => {
                cancel.cancel();
                Err(FetchError::Cancelled)
            }
        };

        match result {
            Ok(response) if response.is_success() => Attempt::Settled(response),
            Ok(response) => {
                let err = ApiError::from_response(&response);
                if err.is_retryable() {
                    Attempt::Retryable(err)
                } else {
                    Attempt::Terminal(err)
                }
            }
            Err(FetchError::Api(err)) => Attempt::Terminal(err),
            Err(FetchError::Cancelled) if cancel.is_cancelled() => {
                tracing::warn!(
                    method = %request.method,
                    url = %request.url,
                    attempt,
                    timeout_ms = timeout.as_millis() as u64,
                    "request timed out"
                );
                Attempt::Terminal(ApiError::timeout())
            }
            Err(FetchError::Cancelled) => Attempt::Retryable(ApiError::network("request aborted")),
            Err(FetchError::Connection(message)) => Attempt::Retryable(ApiError::network(message)),
        }
    }
}

fn decode<R: DeserializeOwned>(response: &HttpResponse) -> Result<R, ApiError> {
    let body = if response.status == STATUS_NO_CONTENT || response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(body).map_err(|e| ApiError::invalid_body(response.status, e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tokio::time::Instant;

    use super::*;
    use crate::error::CODE_INVALID_RESPONSE_BODY;
    use crate::http::HttpMethod;

    #[derive(Debug, Clone)]
    enum Step {
        Respond(u16, &'static str),
        Fail(FetchError),
        Hang,
    }

    /// Replays a script per URL. The last step of a script repeats forever.
    #[derive(Default)]
    struct ScriptedFetcher {
        scripts: Mutex<HashMap<String, VecDeque<Step>>>,
        requests: Mutex<Vec<HttpRequest>>,
        tokens: Mutex<Vec<CancellationToken>>,
    }

    impl ScriptedFetcher {
        fn new() -> Self {
            Self::default()
        }

        fn on(self, url: &str, steps: Vec<Step>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(url.to_string(), steps.into());
            self
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn calls_to(&self, url: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.url == url)
                .count()
        }

        fn next_step(&self, url: &str) -> Step {
            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts.get_mut(url).expect("no script for url");
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().expect("empty script")
            }
        }
    }

    #[async_trait]
    impl Fetch for ScriptedFetcher {
        async fn fetch(
            &self,
            request: &HttpRequest,
            cancel: CancellationToken,
        ) -> Result<HttpResponse, FetchError> {
            self.requests.lock().unwrap().push(request.clone());
            self.tokens.lock().unwrap().push(cancel.clone());
            match self.next_step(&request.url) {
                Step::Respond(status, body) => Ok(HttpResponse {
                    status,
                    status_text: format!("Status {status}"),
                    headers: Vec::new(),
                    body: body.to_string(),
                }),
                Step::Fail(err) => Err(err),
                Step::Hang => {
                    cancel.cancelled().await;
                    Err(FetchError::Cancelled)
                }
            }
        }
    }

    /// Records every sleep that ran to completion.
    #[derive(Default)]
    struct RecordingTimer {
        completed: Mutex<Vec<Duration>>,
    }

    impl RecordingTimer {
        fn completed(&self) -> Vec<Duration> {
            self.completed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Timer for RecordingTimer {
        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
            self.completed.lock().unwrap().push(duration);
        }
    }

    const CONNECTIONS: &str = "/api/connections";

    fn transport(
        fetcher: ScriptedFetcher,
    ) -> (
        Transport<Arc<ScriptedFetcher>, Arc<RecordingTimer>>,
        Arc<ScriptedFetcher>,
        Arc<RecordingTimer>,
    ) {
        let fetcher = Arc::new(fetcher);
        let timer = Arc::new(RecordingTimer::default());
        let transport = Transport::with_parts(
            &TransportConfig::default(),
            Arc::clone(&fetcher),
            Arc::clone(&timer),
        );
        (transport, fetcher, timer)
    }

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().copied().map(Duration::from_millis).collect()
    }

    // --- success ---

    #[tokio::test(start_paused = true)]
    async fn json_body_resolves_after_one_attempt() {
        let (t, fetcher, timer) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![Step::Respond(200, r#"[{"id":"1","name":"Test Connection"}]"#)],
        ));

        let result: Value = t.get(CONNECTIONS).await.unwrap();

        assert_eq!(result, json!([{ "id": "1", "name": "Test Connection" }]));
        assert_eq!(fetcher.calls(), 1);
        assert!(timer.completed().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn no_content_resolves_to_unit() {
        let (t, fetcher, _) =
            transport(ScriptedFetcher::new().on("/api/connections/c1", vec![Step::Respond(204, "")]));

        let options = RequestOptions::method(HttpMethod::Delete);
        t.request::<()>("/api/connections/c1", &options)
            .await
            .unwrap();

        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_content_resolves_to_none() {
        let (t, _, _) =
            transport(ScriptedFetcher::new().on(CONNECTIONS, vec![Step::Respond(204, "ignored")]));

        let result: Option<Value> = t.get(CONNECTIONS).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test(start_paused = true)]
    async fn undecodable_success_body_is_terminal() {
        let (t, fetcher, _) =
            transport(ScriptedFetcher::new().on(CONNECTIONS, vec![Step::Respond(200, "<html>")]));

        let err = t.get::<Vec<Value>>(CONNECTIONS).await.unwrap_err();

        assert_eq!(err.status, 200);
        assert_eq!(err.code.as_deref(), Some(CODE_INVALID_RESPONSE_BODY));
        assert_eq!(fetcher.calls(), 1);
    }

    // --- terminal HTTP errors ---

    #[tokio::test(start_paused = true)]
    async fn not_found_is_thrown_on_first_attempt() {
        let (t, fetcher, timer) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![Step::Respond(404, r#"{"message":"Connection not found"}"#)],
        ));

        let err = t.get::<Value>(CONNECTIONS).await.unwrap_err();

        assert_eq!(err.status, 404);
        assert_eq!(err.message, "Connection not found");
        assert_eq!(fetcher.calls(), 1);
        assert!(timer.completed().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_never_retried() {
        for status in [400, 403, 404, 422] {
            let (t, fetcher, _) = transport(ScriptedFetcher::new().on(
                CONNECTIONS,
                vec![Step::Respond(status, r#"{"message":"nope","code":"E"}"#)],
            ));

            let err = t.get::<Value>(CONNECTIONS).await.unwrap_err();

            assert_eq!(err.status, status);
            assert_eq!(err.code.as_deref(), Some("E"));
            assert_eq!(fetcher.calls(), 1, "status {status}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn non_json_error_body_uses_status_text() {
        let (t, _, _) = transport(
            ScriptedFetcher::new().on(CONNECTIONS, vec![Step::Respond(403, "forbidden!")]),
        );

        let err = t.get::<Value>(CONNECTIONS).await.unwrap_err();
        assert_eq!(err.message, "Status 403");
        assert_eq!(err.status, 403);
    }

    // --- retryable HTTP errors ---

    #[tokio::test(start_paused = true)]
    async fn server_errors_exhaust_three_attempts_with_backoff() {
        for status in [500, 502, 429] {
            let (t, fetcher, timer) = transport(ScriptedFetcher::new().on(
                CONNECTIONS,
                vec![Step::Respond(status, r#"{"message":"Server error"}"#)],
            ));
            let start = Instant::now();

            let err = t.get::<Value>(CONNECTIONS).await.unwrap_err();

            assert_eq!(err.status, status);
            assert_eq!(err.message, "Server error");
            assert_eq!(fetcher.calls(), 3, "status {status}");
            assert_eq!(timer.completed(), ms(&[1000, 2000]));
            assert!(start.elapsed() >= Duration::from_millis(3000));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_surface_the_last_error() {
        let (t, fetcher, _) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![
                Step::Respond(500, r#"{"message":"first"}"#),
                Step::Respond(502, r#"{"message":"second"}"#),
                Step::Respond(503, r#"{"message":"third","code":"UNAVAILABLE"}"#),
            ],
        ));

        let err = t.get::<Value>(CONNECTIONS).await.unwrap_err();

        assert_eq!(err, ApiError::new("third", 503).with_code("UNAVAILABLE"));
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_server_error() {
        let (t, fetcher, timer) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![
                Step::Respond(503, r#"{"message":"Unavailable"}"#),
                Step::Respond(200, r#"[{"id":"1"}]"#),
            ],
        ));

        let result: Value = t.get(CONNECTIONS).await.unwrap();

        assert_eq!(result, json!([{ "id": "1" }]));
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(timer.completed(), ms(&[1000]));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_final_permitted_attempt() {
        let (t, fetcher, _) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![
                Step::Respond(500, "{}"),
                Step::Fail(FetchError::Connection("connection reset".to_string())),
                Step::Respond(200, r#"{"ok":true}"#),
            ],
        ));

        let result: Value = t.get(CONNECTIONS).await.unwrap();

        assert_eq!(result, json!({ "ok": true }));
        assert_eq!(fetcher.calls(), 3);
    }

    // --- network failures ---

    #[tokio::test(start_paused = true)]
    async fn network_failure_is_retried_then_reported_as_status_zero() {
        let (t, fetcher, timer) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![Step::Fail(FetchError::Connection("Failed to fetch".to_string()))],
        ));

        let err = t.get::<Value>(CONNECTIONS).await.unwrap_err();

        assert_eq!(err.status, 0);
        assert_eq!(err.message, "Failed to fetch");
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(timer.completed(), ms(&[1000, 2000]));
    }

    #[tokio::test(start_paused = true)]
    async fn network_failure_without_message_uses_fallback() {
        let (t, _, _) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![Step::Fail(FetchError::Connection(String::new()))],
        ));

        let err = t.get::<Value>(CONNECTIONS).await.unwrap_err();
        assert_eq!(err, ApiError::new("Network error", 0));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_network_error() {
        let (t, fetcher, _) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![
                Step::Fail(FetchError::Connection("Failed to fetch".to_string())),
                Step::Respond(200, r#"[{"id":"1"}]"#),
            ],
        ));

        let result: Value = t.get(CONNECTIONS).await.unwrap();

        assert_eq!(result, json!([{ "id": "1" }]));
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn abort_not_caused_by_timeout_is_a_network_failure() {
        let (t, fetcher, _) = transport(
            ScriptedFetcher::new().on(CONNECTIONS, vec![Step::Fail(FetchError::Cancelled)]),
        );

        let err = t.get::<Value>(CONNECTIONS).await.unwrap_err();

        assert_eq!(err.status, 0);
        assert_eq!(fetcher.calls(), 3);
    }

    // --- timeouts ---

    #[tokio::test(start_paused = true)]
    async fn hanging_call_times_out_with_408() {
        let (t, fetcher, timer) = transport(
            ScriptedFetcher::new().on("/api/connections/c1/health", vec![Step::Hang]),
        );
        let options = RequestOptions::new().with_timeout(Duration::from_millis(10_000));
        let start = Instant::now();

        let err = t
            .request::<Value>("/api/connections/c1/health", &options)
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::new("Request timed out", 408));
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(timer.completed(), ms(&[10_000]));
        assert!(start.elapsed() >= Duration::from_millis(10_000));
        assert!(fetcher.tokens.lock().unwrap()[0].is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn default_timeout_is_thirty_seconds() {
        let (t, _, timer) = transport(ScriptedFetcher::new().on(CONNECTIONS, vec![Step::Hang]));

        let err = t.get::<Value>(CONNECTIONS).await.unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(timer.completed(), ms(&[30_000]));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_on_a_later_attempt_is_terminal() {
        let (t, fetcher, timer) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![Step::Respond(500, "{}"), Step::Hang, Step::Respond(200, "[]")],
        ));
        let options = RequestOptions::new().with_timeout(Duration::from_millis(5_000));

        let err = t.request::<Value>(CONNECTIONS, &options).await.unwrap_err();

        assert_eq!(err, ApiError::timeout());
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(timer.completed(), ms(&[1000, 5000]));
    }

    #[tokio::test(start_paused = true)]
    async fn settled_attempts_never_fire_their_timer() {
        let (t, fetcher, _) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![
                Step::Respond(500, "{}"),
                Step::Fail(FetchError::Connection("reset".to_string())),
                Step::Respond(200, "[]"),
            ],
        ));

        let _: Value = t.get(CONNECTIONS).await.unwrap();
        tokio::time::advance(Duration::from_secs(120)).await;

        let tokens = fetcher.tokens.lock().unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|token| !token.is_cancelled()));
    }

    // --- typed errors ---

    #[tokio::test(start_paused = true)]
    async fn typed_errors_pass_through_unchanged() {
        let upstream = ApiError::new("Service unavailable", 503).with_code("UPSTREAM");
        let (t, fetcher, timer) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![Step::Fail(FetchError::Api(upstream.clone()))],
        ));

        let err = t.get::<Value>(CONNECTIONS).await.unwrap_err();

        assert_eq!(err, upstream);
        assert_eq!(fetcher.calls(), 1);
        assert!(timer.completed().is_empty());
    }

    // --- request shape ---

    #[tokio::test(start_paused = true)]
    async fn every_attempt_sends_the_same_request() {
        let (t, fetcher, _) = transport(ScriptedFetcher::new().on(
            CONNECTIONS,
            vec![Step::Respond(502, "{}"), Step::Respond(201, r#"{"id":"c1"}"#)],
        ));
        let options = RequestOptions::method(HttpMethod::Post)
            .with_header("X-Trace", "abc")
            .with_body(r#"{"name":"New Cluster"}"#);
        let before = options.clone();

        let _: Value = t.request(CONNECTIONS, &options).await.unwrap();

        assert_eq!(options, before);
        let requests = fetcher.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].header("Content-Type"), Some("application/json"));
        assert_eq!(requests[0].header("x-trace"), Some("abc"));
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"name":"New Cluster"}"#));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_path_is_rejected_without_network() {
        let (t, fetcher, _) = transport(ScriptedFetcher::new());

        let err = t.get::<Value>("").await.unwrap_err();

        assert_eq!(err.status, 0);
        assert_eq!(err.code.as_deref(), Some("INVALID_REQUEST"));
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn build_request_joins_base_url() {
        let config = TransportConfig::new("http://localhost:8000/");
        let t = Transport::with_parts(&config, ScriptedFetcher::new(), RecordingTimer::default());

        let req = t
            .build_request("/api/connections", &RequestOptions::new())
            .unwrap();

        assert_eq!(req.url, "http://localhost:8000/api/connections");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.body.is_none());
    }

    // --- concurrency ---

    #[tokio::test(start_paused = true)]
    async fn concurrent_calls_do_not_interact() {
        let (t, fetcher, _) = transport(
            ScriptedFetcher::new()
                .on("/api/metrics/c1", vec![Step::Hang])
                .on("/api/connections", vec![Step::Respond(500, "{}"), Step::Respond(200, "[]")]),
        );
        let slow = RequestOptions::new().with_timeout(Duration::from_millis(1_500));

        let (metrics, connections) = tokio::join!(
            t.request::<Value>("/api/metrics/c1", &slow),
            t.get::<Value>("/api/connections"),
        );

        assert_eq!(metrics.unwrap_err(), ApiError::timeout());
        assert_eq!(connections.unwrap(), json!([]));
        assert_eq!(fetcher.calls_to("/api/metrics/c1"), 1);
        assert_eq!(fetcher.calls_to("/api/connections"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_retry_budget_is_respected() {
        let fetcher = Arc::new(
            ScriptedFetcher::new().on(CONNECTIONS, vec![Step::Respond(500, "{}")]),
        );
        let timer = Arc::new(RecordingTimer::default());
        let config = TransportConfig::default()
            .with_max_retries(4)
            .with_retry_base_delay(Duration::from_millis(10));
        let t = Transport::with_parts(&config, Arc::clone(&fetcher), Arc::clone(&timer));

        let err = t.get::<Value>(CONNECTIONS).await.unwrap_err();

        assert_eq!(err.status, 500);
        assert_eq!(fetcher.calls(), 5);
        assert_eq!(timer.completed(), ms(&[10, 20, 40, 80]));
    }
}
