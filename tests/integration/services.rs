//! Integration tests for the non-chat endpoints

use crate::mock_server::MockServerFixture;
use mockito::Matcher;
use serde_json::json;
use std::io::Write;
use zhipu_rs::files::{FILE_PURPOSE_RETRIEVAL, KNOWLEDGE_TYPE_CUSTOM};
use zhipu_rs::fine_tuning::FINE_TUNE_STATUS_RUNNING;
use zhipu_rs::knowledge::KNOWLEDGE_EMBEDDING_ID_EMBEDDING_2;
use zhipu_rs::videos::VIDEO_STATUS_SUCCESS;
use zhipu_rs::Error;

#[tokio::test]
async fn test_embedding_batch_input() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_matching(
            "POST",
            "/embeddings",
            json!({"model": "embedding-3", "input": ["a", "b"], "dimensions": 256}),
            r#"{"model":"embedding-3","object":"list","data":[{"embedding":[0.1,0.2],"index":0,"object":"embedding"},{"embedding":[0.3,0.4],"index":1,"object":"embedding"}],"usage":{"prompt_tokens":2,"total_tokens":2}}"#,
        )
        .await;

    let res = fixture
        .client()
        .embedding("embedding-3")
        .input(vec!["a".to_string(), "b".to_string()])
        .dimensions(256)
        .execute()
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(res.len(), 2);
    assert_eq!(res.data[1].embedding, vec![0.3, 0.4]);
    assert_eq!(res.usage.total_tokens, 2);
}

#[tokio::test]
async fn test_image_generation() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_matching(
            "POST",
            "/images/generations",
            json!({"model": "cogview-3", "prompt": "a cat", "size": "1024x1024"}),
            r#"{"created":1700000000,"data":[{"url":"https://example.com/cat.png"}]}"#,
        )
        .await;

    let res = fixture
        .client()
        .image_generation("cogview-3")
        .prompt("a cat")
        .size("1024x1024")
        .execute()
        .await
        .unwrap();
    assert_eq!(res.data[0].url, "https://example.com/cat.png");
}

#[tokio::test]
async fn test_video_generation_then_poll() {
    let fixture = MockServerFixture::new().await;
    let _submit = fixture
        .mock_json_matching(
            "POST",
            "/videos/generations",
            json!({"model": "cogvideox", "prompt": "waves"}),
            r#"{"id":"task-1","model":"cogvideox","task_status":"PROCESSING","request_id":"r-1"}"#,
        )
        .await;
    let _poll = fixture
        .mock_json(
            "GET",
            "/async-result/task-1",
            200,
            r#"{"model":"cogvideox","task_status":"SUCCESS","video_result":[{"url":"https://example.com/v.mp4","cover_image_url":"https://example.com/c.png"}]}"#,
        )
        .await;

    let client = fixture.client();
    let task = client
        .video_generation("cogvideox")
        .prompt("waves")
        .execute()
        .await
        .unwrap();
    let result = client.async_result(&task.id).execute().await.unwrap();
    assert_eq!(result.task_status, VIDEO_STATUS_SUCCESS);
    assert!(result.is_finished());
    assert_eq!(result.video_result[0].url, "https://example.com/v.mp4");
}

#[tokio::test]
async fn test_fine_tune_create_sends_hyperparameters() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_matching(
            "POST",
            "/fine_tuning/jobs",
            json!({
                "model": "chatglm3-6b",
                "training_file": "file-train",
                "hyperparameters": {"n_epochs": "auto", "batch_size": 8}
            }),
            r#"{"id":"ft-1","status":"create","training_file":"file-train","error":{"code":"","message":""}}"#,
        )
        .await;

    let job = fixture
        .client()
        .fine_tune_create("chatglm3-6b", "file-train")
        .n_epochs_auto()
        .batch_size(8)
        .execute()
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(job.id, "ft-1");
    assert!(!job.is_terminal());
}

#[tokio::test]
async fn test_fine_tune_events_and_cancel() {
    let fixture = MockServerFixture::new().await;
    let _events = fixture
        .mock_get_with_query(
            "/fine_tuning/jobs/ft-1/events",
            vec![("limit", "10")],
            r#"{"object":"list","has_more":false,"data":[{"id":"ev-1","type":"metrics","level":"info","message":"step","created_at":1,"data":{"loss":0.25,"current_steps":3,"total_steps":10}}]}"#,
        )
        .await;
    let _cancel = fixture
        .mock_json(
            "POST",
            "/fine_tuning/jobs/ft-1/cancel",
            200,
            r#"{"id":"ft-1","status":"cancelled"}"#,
        )
        .await;
    let _get = fixture
        .mock_json("GET", "/fine_tuning/jobs/ft-2", 200, r#"{"id":"ft-2","status":"running"}"#)
        .await;

    let client = fixture.client();
    let events = client.fine_tune_events("ft-1").limit(10).execute().await.unwrap();
    assert_eq!(events.data.len(), 1);
    assert_eq!(events.data[0].event_type, "metrics");
    assert_eq!(events.data[0].data.loss, 0.25);
    assert_eq!(events.data[0].data.total_steps, 10);

    let cancelled = client.fine_tune_cancel("ft-1").execute().await.unwrap();
    assert!(cancelled.is_terminal());

    let running = client.fine_tune_get("ft-2").execute().await.unwrap();
    assert_eq!(running.status, FINE_TUNE_STATUS_RUNNING);
}

#[tokio::test]
async fn test_file_list_sends_query() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_get_with_query(
            "/files",
            vec![
                ("purpose", "retrieval"),
                ("knowledge_id", "kb-1"),
                ("page", "2"),
                ("limit", "5"),
                ("order", "desc"),
            ],
            r#"{"total":1,"list":[{"id":"doc-1","name":"a.pdf","custom_separator":["\n"],"embedding_stat":1,"failInfo":{"embedding_code":0,"embedding_msg":""},"word_num":42}]}"#,
        )
        .await;

    let res = fixture
        .client()
        .file_list(FILE_PURPOSE_RETRIEVAL)
        .knowledge_id("kb-1")
        .page(2)
        .limit(5)
        .order(false)
        .execute()
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(res.total, 1);
    assert_eq!(res.list[0].word_num, 42);
    assert!(res.list[0].fail_info.is_some());
}

#[tokio::test]
async fn test_file_upload_from_disk_for_knowledge() {
    let fixture = MockServerFixture::new().await;
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    writeln!(file, "knowledge content").unwrap();
    let filename = file
        .path()
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap()
        .to_string();

    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/files")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="knowledge_id"\r\n\r\nkb-1"#.into()),
                Matcher::Regex(r#"name="sentence_size"\r\n\r\n300"#.into()),
                Matcher::Regex(format!(r#"filename="{}""#, filename.replace('.', r"\."))),
                Matcher::Regex("knowledge content".into()),
            ]))
            .with_status(200)
            .with_body(format!(
                r#"{{"successInfos":[{{"fileName":"{filename}","documentId":"doc-9"}}],"failedInfos":[]}}"#
            ))
            .create_async()
            .await
    };

    let res = fixture
        .client()
        .file_create(FILE_PURPOSE_RETRIEVAL)
        .knowledge_id("kb-1")
        .sentence_size(300)
        .local_file(file.path())
        .execute()
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(res.success_infos[0].document_id, "doc-9");
    assert!(res.failed_infos.is_empty());
}

#[tokio::test]
async fn test_file_upload_without_file_is_rejected() {
    let fixture = MockServerFixture::new().await;
    let err = fixture
        .client()
        .file_create(FILE_PURPOSE_RETRIEVAL)
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_document_edit_get_delete() {
    let fixture = MockServerFixture::new().await;
    let edit = fixture
        .mock_json_matching(
            "PUT",
            "/document/doc-1",
            json!({"knowledge_type": "5", "custom_separator": ["\n\n"], "sentence_size": "200"}),
            "{}",
        )
        .await;
    let _get = fixture
        .mock_json("GET", "/document/doc-1", 200, r#"{"id":"doc-1","name":"a.pdf","length":1024}"#)
        .await;
    let delete = fixture.mock_json("DELETE", "/document/doc-1", 200, "").await;

    let client = fixture.client();
    client
        .file_edit("doc-1")
        .knowledge_type(KNOWLEDGE_TYPE_CUSTOM)
        .custom_separator(["\n\n"])
        .sentence_size(200)
        .execute()
        .await
        .unwrap();
    edit.assert_async().await;

    let doc = client.file_get("doc-1").execute().await.unwrap();
    assert_eq!(doc.length, 1024);

    client.file_delete("doc-1").execute().await.unwrap();
    delete.assert_async().await;
}

#[tokio::test]
async fn test_file_download_to_path() {
    let fixture = MockServerFixture::new().await;
    let _mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("GET", "/files/file-1/content")
            .with_status(200)
            .with_body("line one\nline two\n")
            .create_async()
            .await
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.jsonl");
    let n = fixture.client().file_download("file-1").save_to(&path).await.unwrap();
    assert_eq!(n, 18);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "line one\nline two\n");
}

#[tokio::test]
async fn test_knowledge_lifecycle() {
    let fixture = MockServerFixture::new().await;
    let create = fixture
        .mock_json_matching(
            "POST",
            "/knowledge",
            json!({"name": "docs", "embedding_id": 3, "description": "product docs"}),
            r#"{"id":"kb-1"}"#,
        )
        .await;
    let edit = fixture
        .mock_json_matching("PUT", "/knowledge/kb-1", json!({"name": "docs-v2"}), "{}")
        .await;
    let _list = fixture
        .mock_get_with_query(
            "/knowledge",
            vec![("page", "1"), ("size", "10")],
            r#"{"total":1,"list":[{"id":"kb-1","name":"docs-v2","embedding_id":3,"document_size":4}]}"#,
        )
        .await;
    let delete = fixture.mock_json("DELETE", "/knowledge/kb-1", 200, "").await;

    let client = fixture.client();
    let created = client
        .knowledge_create("docs", KNOWLEDGE_EMBEDDING_ID_EMBEDDING_2)
        .description("product docs")
        .execute()
        .await
        .unwrap();
    create.assert_async().await;
    assert_eq!(created.id, "kb-1");

    client.knowledge_edit("kb-1").name("docs-v2").execute().await.unwrap();
    edit.assert_async().await;

    let page = client.knowledge_list().page(1).size(10).execute().await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.list[0].document_size, 4);

    client.knowledge_delete("kb-1").execute().await.unwrap();
    delete.assert_async().await;
}
