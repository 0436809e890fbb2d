//! Integration tests for error mapping, signing and cancellation

use crate::mock_server::MockServerFixture;
use mockito::Matcher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use zhipu_rs::types::ChatCompletionMessage;
use zhipu_rs::{Client, Error};

#[tokio::test]
async fn test_api_error_is_structured() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_response(
            "POST",
            "/chat/completions",
            400,
            r#"{"error":{"code":"1214","message":"messages must not be empty"}}"#,
        )
        .await;

    let err = fixture
        .client()
        .chat_completion("glm-4")
        .execute()
        .await
        .unwrap_err();

    match &err {
        Error::Api { status, error } => {
            assert_eq!(*status, 400);
            assert_eq!(error.code, "1214");
            assert_eq!(error.message, "messages must not be empty");
        }
        other => panic!("expected api error, got {other:?}"),
    }
    assert_eq!(err.api_code(), Some("1214"));
    assert_eq!(err.http_status(), Some(400));
    assert_eq!(err.to_string(), "messages must not be empty");
}

#[tokio::test]
async fn test_unparsable_error_body_falls_back_to_status_text() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_response("GET", "/batches/b-1", 502, "<html>bad gateway</html>")
        .await;

    let err = fixture.client().batch_get("b-1").execute().await.unwrap_err();
    match err {
        Error::Api { status, error } => {
            assert_eq!(status, 502);
            assert!(error.code.is_empty());
            assert_eq!(error.message, "502 Bad Gateway");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stream_error_carries_only_status() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_response(
            "POST",
            "/chat/completions",
            429,
            r#"{"error":{"code":"1302","message":"rate limited"}}"#,
        )
        .await;

    let err = fixture
        .client()
        .chat_completion("glm-4")
        .add_message(ChatCompletionMessage::user("hi"))
        .on_chunk(|_| Ok(()))
        .execute()
        .await
        .unwrap_err();

    match &err {
        Error::Status { status } => assert!(status.starts_with("429"), "got {status}"),
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(err.http_status(), Some(429));
    assert_eq!(err.api_code(), None);
}

#[tokio::test]
async fn test_requests_carry_signed_bearer_token() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("GET", "/knowledge/capacity")
            .match_header(
                "authorization",
                Matcher::Regex(r"^Bearer [A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+$".into()),
            )
            .match_header("x-request-id", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"used":{"word_num":10,"length":20},"total":{"word_num":100,"length":200}}"#)
            .create_async()
            .await
    };

    let capacity = fixture.client().knowledge_capacity().execute().await.unwrap();
    mock.assert_async().await;
    assert_eq!(capacity.used.length, 20);
    assert_eq!(capacity.remaining_length(), 180);
}

#[tokio::test]
async fn test_cancelled_token_fails_before_sending() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("{}")
            .expect(0)
            .create_async()
            .await
    };

    let token = CancellationToken::new();
    token.cancel();
    let err = fixture
        .client()
        .with_cancellation(token)
        .chat_completion("glm-4")
        .execute()
        .await
        .unwrap_err();

    assert!(err.is_cancelled(), "got {err:?}");
    mock.assert_async().await;
}

/// Serve one streamed chat chunk on a raw socket, then keep the body open.
async fn serve_one_chunk_then_hang() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        let line = "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"He\"}}]}\n\n";
        let head = "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ntransfer-encoding: chunked\r\n\r\n";
        let chunk = format!("{:x}\r\n{line}\r\n", line.len());
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(chunk.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_cancelling_mid_stream_stops_the_read() {
    let base_url = serve_one_chunk_then_hang().await;
    let token = CancellationToken::new();
    let client = Client::builder()
        .api_key(crate::mock_server::TEST_API_KEY)
        .base_url(&base_url)
        .build()
        .unwrap()
        .with_cancellation(token.clone());

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let request = client
        .chat_completion("glm-4")
        .add_message(ChatCompletionMessage::user("hi"))
        .on_chunk(move |chunk| {
            assert_eq!(chunk.content(), "He");
            counter.fetch_add(1, Ordering::SeqCst);
            token.cancel();
            Ok(())
        })
        .execute();

    let result = tokio::time::timeout(Duration::from_secs(5), request)
        .await
        .expect("cancellation should end the stream promptly");

    match result {
        Err(err) => assert!(err.is_cancelled(), "got {err:?}"),
        Ok(res) => panic!("expected cancellation, got {res:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_path_parameter_is_rejected_locally() {
    let fixture = MockServerFixture::new().await;
    let err = fixture.client().fine_tune_get("").execute().await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got {err:?}");
}
