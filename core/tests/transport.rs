//! Verb functions against a recording in-process transport.
//!
//! The transport records every request it receives and answers with a canned
//! completion, so each test checks both what was sent and what came back.

use std::sync::Arc;

use api_client::{
    ApiClient, Completion, ErrorEnvelope, Headers, HttpMethod, HttpRequest, HttpResponse,
    ResponseStatus, Transport, TransportError, Values,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

#[derive(Debug)]
struct Recorder {
    requests: Mutex<Vec<HttpRequest>>,
    reply: Completion,
}

impl Recorder {
    fn replying(reply: Completion) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply,
        }
    }

    fn last(&self) -> HttpRequest {
        self.requests.lock().last().cloned().expect("no request recorded")
    }
}

#[async_trait]
impl Transport for Recorder {
    async fn execute(&self, request: HttpRequest) -> Completion {
        self.requests.lock().push(request);
        self.reply.clone()
    }
}

fn ok(text: &str) -> Completion {
    let mut response = HttpResponse::new(200, text);
    response.body = Some(json!({"status": "OK"}));
    Completion::success(response)
}

fn unauthorized() -> Completion {
    Completion::failure(
        TransportError::Status(401),
        Some(HttpResponse::new(401, r#"{ "message": "error message" }"#)),
    )
}

fn headers(pairs: &[(&str, &str)]) -> Headers {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn values(value: Value) -> Values {
    value.as_object().cloned().unwrap()
}

fn expected_unauthorized() -> ErrorEnvelope {
    ErrorEnvelope::new(json!({"message": "error message"}), ResponseStatus::Code(401))
}

// ---------------------------------------------------------------------------
// get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_resolves_parsed_text() {
    let client = ApiClient::new(Recorder::replying(ok(r#"{ "id": 1, "token": "123" }"#)));
    client.init("https://api.example.com", &Headers::new());

    let data = client
        .get("/users/1", &headers(&[("header", "some-value")]))
        .await
        .unwrap();

    assert_eq!(data, json!({"id": 1, "token": "123"}));
    let req = client.transport().last();
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.url, "https://api.example.com/users/1");
    assert_eq!(req.headers["header"], "some-value");
    assert_eq!(req.headers["Accept"], "application/json");
    assert!(req.body.is_none());
}

#[tokio::test]
async fn get_rejects_on_transport_failure() {
    let client = ApiClient::new(Recorder::replying(unauthorized()));

    let err = client.get("endpoint", &Headers::new()).await.unwrap_err();

    assert_eq!(err, expected_unauthorized());
    assert!(client.transport().last().url.contains("endpoint"));
}

// ---------------------------------------------------------------------------
// post / put
// ---------------------------------------------------------------------------

#[tokio::test]
async fn post_sends_values_and_resolves() {
    let client = ApiClient::new(Recorder::replying(ok(r#"{ "id": 1 }"#)));
    let body = values(json!({"email": "email@dom.com"}));

    let data = client
        .post("/users", &body, &headers(&[("header", "some-value")]))
        .await
        .unwrap();

    assert_eq!(data, json!({"id": 1}));
    let req = client.transport().last();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.body, Some(body));
    assert_eq!(req.headers["header"], "some-value");
    assert_eq!(req.headers["Accept"], "application/json");
}

#[tokio::test]
async fn post_rejects_on_transport_failure() {
    let client = ApiClient::new(Recorder::replying(unauthorized()));
    let body = values(json!({"email": "email@dom.com"}));

    let err = client.post("endpoint", &body, &Headers::new()).await.unwrap_err();

    assert_eq!(err, expected_unauthorized());
    assert_eq!(client.transport().last().body, Some(body));
}

#[tokio::test]
async fn put_sends_values_and_resolves() {
    let client = ApiClient::new(Recorder::replying(ok(r#"{ "id": 1 }"#)));
    let body = values(json!({"email": "email@dom.com"}));

    let data = client
        .put("/users/1", &body, &headers(&[("header", "some-value")]))
        .await
        .unwrap();

    assert_eq!(data, json!({"id": 1}));
    let req = client.transport().last();
    assert_eq!(req.method, HttpMethod::Put);
    assert_eq!(req.body, Some(body));
}

#[tokio::test]
async fn put_rejects_on_transport_failure() {
    let client = ApiClient::new(Recorder::replying(unauthorized()));

    let err = client
        .put("endpoint", &values(json!({"email": "email@dom.com"})), &Headers::new())
        .await
        .unwrap_err();

    assert_eq!(err, expected_unauthorized());
}

#[tokio::test]
async fn empty_values_are_still_sent() {
    let client = ApiClient::new(Recorder::replying(ok("")));

    let data = client.post("/users", &Values::new(), &Headers::new()).await.unwrap();

    assert_eq!(data, json!({}));
    assert_eq!(client.transport().last().body, Some(Values::new()));
}

// ---------------------------------------------------------------------------
// del
// ---------------------------------------------------------------------------

#[tokio::test]
async fn del_resolves_parsed_text() {
    let client = ApiClient::new(Recorder::replying(ok(r#"{ "id": 1, "token": "123" }"#)));

    let data = client
        .del("endpoint", &headers(&[("header", "some-value")]))
        .await
        .unwrap();

    assert_eq!(data, json!({"id": 1, "token": "123"}));
    let req = client.transport().last();
    assert_eq!(req.method, HttpMethod::Delete);
    assert_eq!(req.headers["header"], "some-value");
    assert!(req.body.is_none());
}

#[tokio::test]
async fn del_rejects_on_transport_failure() {
    let client = ApiClient::new(Recorder::replying(unauthorized()));

    let err = client.del("endpoint", &Headers::new()).await.unwrap_err();

    assert_eq!(err, expected_unauthorized());
}

// ---------------------------------------------------------------------------
// normalization edge cases through the verbs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_text_rejects_on_success() {
    let client = ApiClient::new(Recorder::replying(ok("{ not json")));

    let err = client.get("/users/1", &Headers::new()).await.unwrap_err();

    assert_eq!(err, ErrorEnvelope::unknown(ResponseStatus::Code(200)));
    assert_eq!(err.message(), Some("Unknown error"));
}

#[tokio::test]
async fn missing_response_rejects_with_unknown_status() {
    let client = ApiClient::new(Recorder::replying(Completion::failure(
        TransportError::Request("connection refused".to_string()),
        None,
    )));

    let err = client.del("/users/1", &Headers::new()).await.unwrap_err();

    assert_eq!(err.status, ResponseStatus::Unavailable);
    assert_eq!(
        serde_json::to_value(&err).unwrap(),
        json!({"error": true, "data": {"message": "Unknown error"}, "status": "unknown"})
    );
}

// ---------------------------------------------------------------------------
// configuration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn per_call_header_overrides_init_header() {
    let client = ApiClient::new(Recorder::replying(ok("{}")));
    client.init("https://x", &headers(&[("Authorization", "Bearer t")]));

    client
        .get("/p", &headers(&[("Authorization", "Bearer t2")]))
        .await
        .unwrap();

    let req = client.transport().last();
    assert_eq!(req.url, "https://x/p");
    assert_eq!(
        req.headers,
        headers(&[("Accept", "application/json"), ("Authorization", "Bearer t2")])
    );
}

#[tokio::test]
async fn init_layers_across_calls() {
    let client = ApiClient::new(Recorder::replying(ok("{}")));
    client.init("https://api.example.com", &headers(&[("X-Client", "web")]));
    client.init("https://api.example.com/v2", &headers(&[("Authorization", "Bearer t")]));

    client.get("/me", &Headers::new()).await.unwrap();
    client.get("/me", &Headers::new()).await.unwrap();

    let requests = client.transport().requests.lock().clone();
    assert_eq!(requests.len(), 2);
    for req in requests {
        assert_eq!(req.url, "https://api.example.com/v2/me");
        assert_eq!(
            req.headers,
            headers(&[
                ("Accept", "application/json"),
                ("Authorization", "Bearer t"),
                ("X-Client", "web"),
            ])
        );
    }
}

#[tokio::test]
async fn clients_sharing_a_transport_keep_separate_config() {
    let recorder = Arc::new(Recorder::replying(ok("{}")));
    let first = ApiClient::new(recorder.clone());
    let second = ApiClient::new(recorder.clone());
    first.init("https://first", &headers(&[("Authorization", "Bearer a")]));
    second.init("https://second", &Headers::new());

    first.get("/p", &Headers::new()).await.unwrap();
    second.get("/p", &Headers::new()).await.unwrap();

    let requests = recorder.requests.lock().clone();
    assert_eq!(requests[0].url, "https://first/p");
    assert_eq!(requests[0].headers["Authorization"], "Bearer a");
    assert_eq!(requests[1].url, "https://second/p");
    assert!(!requests[1].headers.contains_key("Authorization"));
}

#[tokio::test]
async fn per_call_header_overrides_default_ignoring_case() {
    let client = ApiClient::new(Recorder::replying(ok("{}")));

    client
        .get("/p", &headers(&[("accept", "text/plain")]))
        .await
        .unwrap();

    assert_eq!(client.transport().last().headers, headers(&[("accept", "text/plain")]));
}

/// Transport with no `Debug` impl.
struct NoContent;

#[async_trait]
impl Transport for NoContent {
    async fn execute(&self, _request: HttpRequest) -> Completion {
        Completion::success(HttpResponse::empty(204))
    }
}

#[tokio::test]
async fn transport_needs_no_debug_impl() {
    let client = ApiClient::new(NoContent);

    let data = client.get("/p", &Headers::new()).await.unwrap();

    assert_eq!(data, json!({}));
    assert!(format!("{client:?}").starts_with("ApiClient { config:"));
}
