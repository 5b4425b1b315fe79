//! Integration tests for the HTTP page fetcher.

use std::time::{Duration, Instant};

use board_notifier::error::AppError;
use board_notifier::models::HttpConfig;
use board_notifier::services::{HttpFetcher, PageFetcher};
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_config(delay_ms: u64) -> HttpConfig {
    HttpConfig {
        request_delay_ms: delay_ms,
        username: Some("student".to_string()),
        password: Some("secret".to_string()),
        ..HttpConfig::default()
    }
}

#[tokio::test]
async fn sends_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/board/1.html"))
        .and(basic_auth("student", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Subject: hi<BR>"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&http_config(0)).unwrap();
    let text = fetcher
        .fetch(&format!("{}/board/1.html", server.uri()))
        .await
        .unwrap();

    assert_eq!(text, "Subject: hi<BR>");
}

#[tokio::test]
async fn non_success_status_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/board/missing.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&http_config(0)).unwrap();
    let url = format!("{}/board/missing.html", server.uri());
    let err = fetcher.fetch(&url).await.unwrap_err();

    match err {
        AppError::Fetch { url: failed, message } => {
            assert_eq!(failed, url);
            assert!(message.contains("404"));
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn decodes_declared_shift_jis() {
    let server = MockServer::start().await;
    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("Subject: 休講のお知らせ<BR>");
    Mock::given(method("GET"))
        .and(path("/board/2.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(bytes.into_owned(), "text/html; charset=Shift_JIS"),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&http_config(0)).unwrap();
    let text = fetcher
        .fetch(&format!("{}/board/2.html", server.uri()))
        .await
        .unwrap();

    assert_eq!(text, "Subject: 休講のお知らせ<BR>");
}

#[tokio::test]
async fn pauses_after_every_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&http_config(150)).unwrap();
    let url = format!("{}/board/new.html", server.uri());

    let start = Instant::now();
    fetcher.fetch(&url).await.unwrap();
    fetcher.fetch(&url).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(300));
}
