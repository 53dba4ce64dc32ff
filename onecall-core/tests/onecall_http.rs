//! End-to-end tests for `OneCallClient` over the real HTTP transport.
//!
//! The client is blocking, so each call runs on a `spawn_blocking` thread
//! while the mock server is driven by the test runtime.

use std::{net::TcpListener, time::Duration};

use onecall_core::{
    DecodeErrorKind, ForecastResponse, OneCallClient, OneCallError, OptionalParameter,
    ReqwestTransport, exclude_sections, language, metric_units,
};
use rust_decimal_macros::dec;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const SAMPLE: &str = include_str!("../testdata/onecall.json");
const APP_ID: &str = "c8b58ab0-1360-4a3a-9f70-3742e48ad2fe";
const ENDPOINT: &str = "/data/2.5/onecall";

async fn fetch(
    base_url: String,
    timeout: Duration,
    params: Vec<OptionalParameter>,
) -> Result<ForecastResponse, OneCallError> {
    fetch_with(base_url, move || Ok(ReqwestTransport::with_timeout(timeout)?), params).await
}

/// `make_transport` runs on the blocking thread, where the client must live.
async fn fetch_with<F>(
    base_url: String,
    make_transport: F,
    params: Vec<OptionalParameter>,
) -> Result<ForecastResponse, OneCallError>
where
    F: FnOnce() -> Result<ReqwestTransport, OneCallError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || -> Result<ForecastResponse, OneCallError> {
        let transport = make_transport()?;
        OneCallClient::with_transport(base_url, transport).fetch_forecast(
            dec!(3.14),
            dec!(5.67),
            APP_ID,
            &params,
        )
    })
    .await
    .expect("blocking task panicked")
}

async fn mount_sample(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("lat", "3.14"))
        .and(query_param("lon", "5.67"))
        .and(query_param("appid", APP_ID))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(SAMPLE),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn only_query(server: &MockServer) -> Option<String> {
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "exactly one request per call");
    requests[0].url.query().map(str::to_owned)
}

#[tokio::test]
async fn test_fetch_with_default_parameters() {
    let server = MockServer::start().await;
    mount_sample(&server).await;

    let resp = fetch(format!("{}{ENDPOINT}", server.uri()), Duration::from_secs(5), vec![])
        .await
        .expect("forecast");

    assert_eq!(
        only_query(&server).await.as_deref(),
        Some("lat=3.14&lon=5.67&appid=c8b58ab0-1360-4a3a-9f70-3742e48ad2fe")
    );
    assert_eq!(resp.current.temp, dec!(284.07));
    assert_eq!(resp.alerts[0].tags, ["Extreme temperature value"]);
    assert_eq!(
        resp.current.rain.as_ref().map(|r| r["1h"].to_string()).as_deref(),
        Some("0.21")
    );
}

#[tokio::test]
async fn test_fetch_with_optional_parameters() {
    let server = MockServer::start().await;
    mount_sample(&server).await;

    let params = vec![exclude_sections(["foo", "bar"]), metric_units(), language("en")];
    let resp = fetch(format!("{}{ENDPOINT}", server.uri()), Duration::from_secs(5), params)
        .await
        .expect("forecast");

    assert_eq!(
        only_query(&server).await.as_deref(),
        Some("lat=3.14&lon=5.67&appid=c8b58ab0-1360-4a3a-9f70-3742e48ad2fe&excludes=foo,bar&units=metric&lang=en")
    );

    let expected = onecall_core::decode::from_str(SAMPLE).expect("sample decodes");
    assert_eq!(resp, expected);
}

#[tokio::test]
async fn test_error_payload_is_decode_failure_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"cod":401,"message":"Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let err = fetch(format!("{}{ENDPOINT}", server.uri()), Duration::from_secs(5), vec![])
        .await
        .unwrap_err();

    match err {
        OneCallError::Decode(e) => {
            assert_eq!(e.kind(), DecodeErrorKind::MissingField);
            assert_eq!(e.status(), Some(401));
            assert!(e.service_message().unwrap_or_default().starts_with("Invalid API key"));
        }
        other => panic!("expected decode failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = fetch(format!("{}{ENDPOINT}", server.uri()), Duration::from_secs(5), vec![])
        .await
        .unwrap_err();

    assert!(err.is_decode());
}

#[tokio::test]
async fn test_connection_refused_is_transport_failure() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };

    let err = fetch(format!("http://127.0.0.1:{port}{ENDPOINT}"), Duration::from_secs(5), vec![])
        .await
        .unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test]
async fn test_timeout_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SAMPLE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = fetch(format!("{}{ENDPOINT}", server.uri()), Duration::from_millis(200), vec![])
        .await
        .unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test]
async fn test_caller_built_client_keeps_its_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SAMPLE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let make_transport = || {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .expect("client builds");
        Ok(ReqwestTransport::from_client(http))
    };

    let err = fetch_with(format!("{}{ENDPOINT}", server.uri()), make_transport, vec![])
        .await
        .unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test]
async fn test_caller_built_client_fetches_forecast() {
    let server = MockServer::start().await;
    mount_sample(&server).await;

    let make_transport = || Ok(ReqwestTransport::from_client(reqwest::blocking::Client::new()));
    let resp = fetch_with(format!("{}{ENDPOINT}", server.uri()), make_transport, vec![])
        .await
        .expect("forecast");

    assert_eq!(resp.current.temp, dec!(284.07));
}
