//! Integration tests for streaming chat completions

use crate::mock_server::MockServerFixture;
use std::sync::{Arc, Mutex};
use zhipu_rs::chat::types::FINISH_REASON_STOP;
use zhipu_rs::types::ChatCompletionMessage;
use zhipu_rs::Error;

fn recorder() -> (Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    (seen.clone(), seen)
}

#[tokio::test]
async fn test_stream_folds_chunks_into_one_response() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_sse_stream(&[
            r#"{"id":"c1","created":1,"model":"glm-4","choices":[{"index":0,"delta":{"role":"assistant","content":"He"}}]}"#,
            r#"{"id":"c1","created":1,"model":"glm-4","choices":[{"index":0,"delta":{"content":"llo"},"finish_reason":"stop"}],"usage":{"prompt_tokens":3,"completion_tokens":2,"total_tokens":5}}"#,
            "data: [DONE]",
        ])
        .await;

    let (seen, handle) = recorder();
    let res = fixture
        .client()
        .chat_completion("glm-4")
        .add_message(ChatCompletionMessage::user("hi"))
        .on_chunk(move |chunk| {
            handle.lock().unwrap().push(chunk.content().to_string());
            Ok(())
        })
        .execute()
        .await
        .expect("stream should succeed");

    mock.assert_async().await;
    assert_eq!(*seen.lock().unwrap(), vec!["He".to_string(), "llo".to_string()]);
    assert_eq!(res.id, "c1");
    assert_eq!(res.model, "glm-4");
    assert_eq!(res.choices.len(), 1);
    assert_eq!(res.choices[0].message.role, "assistant");
    assert_eq!(res.choices[0].message.content, "Hello");
    assert_eq!(res.finish_reason(), FINISH_REASON_STOP);
    assert_eq!(res.usage.total_tokens, 5);
}

#[tokio::test]
async fn test_lines_after_done_are_ignored() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_sse_raw(concat!(
            ": keep-alive\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n",
            "\n",
            "data: [DONE]\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n",
            "data: not json\n",
        ))
        .await;

    let (seen, handle) = recorder();
    let res = fixture
        .client()
        .chat_completion("glm-4")
        .on_chunk(move |chunk| {
            handle.lock().unwrap().push(chunk.content().to_string());
            Ok(())
        })
        .execute()
        .await
        .expect("trailing lines must not be read");

    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(res.content(), "a");
}

#[tokio::test]
async fn test_unterminated_last_line_is_decoded() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_sse_raw("data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}")
        .await;

    let res = fixture
        .client()
        .chat_completion("glm-4")
        .on_chunk(|_| Ok(()))
        .execute()
        .await
        .unwrap();
    assert_eq!(res.content(), "tail");
}

#[tokio::test]
async fn test_malformed_chunk_aborts_stream() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_sse_stream(&[
            r#"{"choices":[{"delta":{"content":"ok"}}]}"#,
            r#"{"choices":[{"delta":"#,
            r#"{"choices":[{"delta":{"content":"never"}}]}"#,
        ])
        .await;

    let (seen, handle) = recorder();
    let err = fixture
        .client()
        .chat_completion("glm-4")
        .on_chunk(move |chunk| {
            handle.lock().unwrap().push(chunk.content().to_string());
            Ok(())
        })
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Serialization(_)), "got {err:?}");
    assert_eq!(*seen.lock().unwrap(), vec!["ok".to_string()]);
}

#[tokio::test]
async fn test_handler_error_stops_stream() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_sse_stream(&[
            r#"{"choices":[{"delta":{"content":"1"}}]}"#,
            r#"{"choices":[{"delta":{"content":"2"}}]}"#,
            r#"{"choices":[{"delta":{"content":"3"}}]}"#,
            "[DONE]",
        ])
        .await;

    let (seen, handle) = recorder();
    let err = fixture
        .client()
        .chat_completion("glm-4")
        .on_chunk(move |chunk| {
            let mut seen = handle.lock().unwrap();
            seen.push(chunk.content().to_string());
            if seen.len() == 2 {
                anyhow::bail!("enough");
            }
            Ok(())
        })
        .execute()
        .await
        .unwrap_err();

    match err {
        Error::Handler(inner) => assert_eq!(inner.to_string(), "enough"),
        other => panic!("expected handler error, got {other:?}"),
    }
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_streamed_tool_calls_are_collected() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_sse_stream(&[
            r#"{"choices":[{"index":0,"delta":{"role":"assistant","tool_calls":[{"id":"call_1","type":"function","function":{"name":"get_weather","arguments":"{\"city\":\"Beijing\"}"}}]},"finish_reason":"tool_calls"}]}"#,
            "[DONE]",
        ])
        .await;

    let res = fixture
        .client()
        .chat_completion("glm-4")
        .on_chunk(|_| Ok(()))
        .execute()
        .await
        .unwrap();

    let calls = &res.choices[0].message.tool_calls;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].function.as_ref().map(|f| f.name.as_str()), Some("get_weather"));
    assert_eq!(res.finish_reason(), "tool_calls");
}
