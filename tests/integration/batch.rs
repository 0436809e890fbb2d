//! Integration tests for the batch round trip: upload, create, download, read

use crate::mock_server::MockServerFixture;
use mockito::Matcher;
use serde_json::json;
use zhipu_rs::batch::{BatchFileWriter, BatchResultReader, BATCH_ENDPOINT_V4_CHAT_COMPLETIONS};
use zhipu_rs::chat::ChatCompletionResponse;
use zhipu_rs::files::FILE_PURPOSE_BATCH;
use zhipu_rs::types::ChatCompletionMessage;
use zhipu_rs::Error;

#[tokio::test]
async fn test_batch_round_trip() {
    let fixture = MockServerFixture::new().await;
    let client = fixture.client();

    let mut writer = BatchFileWriter::new(Vec::new());
    for (i, q) in ["1+1?", "2+2?"].iter().enumerate() {
        let req = client
            .chat_completion("glm-4-flash")
            .add_message(ChatCompletionMessage::user(*q));
        writer.write(&format!("req-{i}"), &req).unwrap();
    }
    assert_eq!(writer.written(), 2);
    let jsonl = writer.into_inner();

    let upload = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/files")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".into()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="purpose"\r\n\r\nbatch"#.into()),
                Matcher::Regex(r#"filename="requests.jsonl""#.into()),
                Matcher::Regex(r#""custom_id":"req-1""#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"id":"file-in","object":"file","bytes":120,"filename":"requests.jsonl","purpose":"batch"}"#)
            .create_async()
            .await
    };
    let uploaded = client
        .file_create(FILE_PURPOSE_BATCH)
        .file(jsonl, "requests.jsonl")
        .execute()
        .await
        .unwrap();
    upload.assert_async().await;
    assert_eq!(uploaded.id, "file-in");

    let create = fixture
        .mock_json_matching(
            "POST",
            "/batches",
            json!({
                "input_file_id": "file-in",
                "endpoint": BATCH_ENDPOINT_V4_CHAT_COMPLETIONS,
                "completion_window": "24h"
            }),
            r#"{"id":"batch-1","status":"validating","input_file_id":"file-in","request_counts":{"total":2}}"#,
        )
        .await;
    let batch = client
        .batch_create()
        .input_file_id(&uploaded.id)
        .endpoint(BATCH_ENDPOINT_V4_CHAT_COMPLETIONS)
        .execute()
        .await
        .unwrap();
    create.assert_async().await;
    assert_eq!(batch.id, "batch-1");
    assert_eq!(batch.request_counts.total, 2);

    let output = concat!(
        r#"{"id":"r1","custom_id":"req-0","response":{"status_code":200,"body":{"choices":[{"message":{"role":"assistant","content":"2"}}]}}}"#,
        "\n\n",
        r#"{"id":"r2","custom_id":"req-1","response":{"status_code":200,"body":{"choices":[{"message":{"role":"assistant","content":"4"}}]}}}"#,
        "\n",
    );
    let _download = {
        let mut server = fixture.server.lock().await;
        server
            .mock("GET", "/files/file-out/content")
            .with_status(200)
            .with_body(output)
            .create_async()
            .await
    };
    let mut downloaded = Vec::new();
    let n = client
        .file_download("file-out")
        .write_to(&mut downloaded)
        .await
        .unwrap();
    assert_eq!(n as usize, output.len());

    let results: Vec<_> = BatchResultReader::<_, ChatCompletionResponse>::new(std::io::Cursor::new(downloaded))
        .collect::<zhipu_rs::Result<_>>()
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].custom_id, "req-0");
    assert_eq!(results[1].response.status_code, 200);
    assert_eq!(results[1].response.body.choices[0].message.content, "4");
}

#[tokio::test]
async fn test_batch_create_requires_input_file() {
    let fixture = MockServerFixture::new().await;
    let err = fixture
        .client()
        .batch_create()
        .endpoint(BATCH_ENDPOINT_V4_CHAT_COMPLETIONS)
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_download_failure_is_a_status_error() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_response("GET", "/files/missing/content", 404, r#"{"error":{"code":"1","message":"gone"}}"#)
        .await;

    let mut sink = Vec::new();
    let err = fixture
        .client()
        .file_download("missing")
        .write_to(&mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Status { .. }), "got {err:?}");
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_batch_list_and_cancel() {
    let fixture = MockServerFixture::new().await;
    let _list = fixture
        .mock_get_with_query(
            "/batches",
            vec![("after", "batch-0"), ("limit", "2")],
            r#"{"object":"list","data":[{"id":"batch-1"},{"id":"batch-2"}],"has_more":true}"#,
        )
        .await;
    let cancel = fixture
        .mock_json("POST", "/batches/batch-1/cancel", 200, r#"{"id":"batch-1","status":"cancelling"}"#)
        .await;

    let client = fixture.client();
    let page = client.batch_list().after("batch-0").limit(2).execute().await.unwrap();
    assert_eq!(page.data.len(), 2);
    assert!(page.has_more);

    client.batch_cancel("batch-1").execute().await.unwrap();
    cancel.assert_async().await;
}
