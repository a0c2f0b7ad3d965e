//! In-process API tests: drive the router with `oneshot` against a temp
//! data directory and a deterministic embedder.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use doctopic_core::DocTopicConfig;
use doctopic_infer::{EmbedderBackend, EmbeddingResult, TopicClassifier};
use doctopic_server::{build_router, AppState};
use doctopic_store::KeywordStore;
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "doctopic-test-boundary";
const LABELS: &[&str] = &["Sport", "Music", "Art", "Science"];

/// Counts label words in the text, plus a floor so no vector is zero.
struct WordCountEmbedder;

impl EmbedderBackend for WordCountEmbedder {
    fn embed(&self, text: &str) -> Option<EmbeddingResult> {
        let lower = text.to_lowercase();
        let embedding = LABELS
            .iter()
            .map(|w| 0.1 + lower.matches(&w.to_lowercase()).count() as f32)
            .collect();
        Some(EmbeddingResult { embedding })
    }

    fn dimension(&self) -> usize {
        LABELS.len()
    }

    fn is_available(&self) -> bool {
        true
    }
}

struct TestApp {
    dir: tempfile::TempDir,
    router: Router,
}

fn setup_with(configure: impl FnOnce(&mut DocTopicConfig)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("topics_keywords");
    std::fs::create_dir_all(&folder).unwrap();
    std::fs::write(
        folder.join("Environment.json"),
        r#"["climate", "green", "energy"]"#,
    )
    .unwrap();

    let mut config = DocTopicConfig::from_lookup(dir.path(), |_| None).unwrap();
    configure(&mut config);

    let keywords = KeywordStore::open(config.data_paths.keyword_source()).unwrap();
    let labels = LABELS.iter().map(|s| s.to_string()).collect();
    let classifier = TopicClassifier::new(labels, Arc::new(WordCountEmbedder)).unwrap();

    let state = Arc::new(AppState::new(config, keywords, classifier));
    TestApp {
        router: build_router(state),
        dir,
    }
}

fn setup() -> TestApp {
    setup_with(|_| {})
}

fn multipart(uri: &str, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = setup();
    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["topics"], 1);
    assert_eq!(body["labels"], 4);
}

#[tokio::test]
async fn test_list_and_get_topics() {
    let app = setup();
    let (status, body) = send(&app, get("/api/topics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topics"], serde_json::json!(["Environment"]));
    assert_eq!(body["labels"][0], "Sport");
    assert_eq!(body["policy"], "substring");

    let (status, body) = send(&app, get("/api/topics/Environment")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["keywords"], serde_json::json!(["climate", "green", "energy"]));

    let (status, body) = send(&app, get("/api/topics/Sports")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn test_reload_picks_up_new_topic() {
    let app = setup();
    std::fs::write(
        app.dir.path().join("topics_keywords/Technology.json"),
        r#"["software", "robot"]"#,
    )
    .unwrap();

    let reload = Request::builder()
        .method("POST")
        .uri("/api/topics/reload")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, reload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topics"], 2);

    let (status, _) = send(&app, get("/api/topics/Technology")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_failed_reload_keeps_topics_and_is_not_startup() {
    let app = setup();
    std::fs::write(app.dir.path().join("topics_keywords/Broken.json"), "{").unwrap();

    let reload = Request::builder()
        .method("POST")
        .uri("/api/topics/reload")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, reload).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "keyword_data");
    assert!(body["error"].as_str().unwrap().contains("Broken.json"));

    let (status, body) = send(&app, get("/api/topics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topics"], serde_json::json!(["Environment"]));
}

#[tokio::test]
async fn test_analyze_txt() {
    let app = setup();
    let request = multipart(
        "/api/analyze",
        &[("topic", "Environment")],
        Some((
            "report.txt",
            b"Climate change affects green energy and the economy.".as_slice(),
        )),
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Analysis Results");
    assert_eq!(body["topic"], "Environment");
    assert_eq!(body["filename"], "report.txt");
    assert_eq!(body["result"]["total_words"], 8);
    assert_eq!(body["result"]["keyword_count"], 3);
    assert_eq!(body["result"]["match_percent"], 37.5);
}

#[tokio::test]
async fn test_analyze_with_token_policy() {
    let app = setup();
    let request = multipart(
        "/api/analyze",
        &[("topic", "Environment"), ("policy", "token")],
        Some(("report.txt", b"green energy green".as_slice())),
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"], "token");
    assert_eq!(body["result"]["keyword_count"], 3);
}

#[tokio::test]
async fn test_analyze_empty_file_is_zero_result() {
    let app = setup();
    let request = multipart(
        "/api/analyze",
        &[("topic", "Environment")],
        Some(("empty.txt", b"   ".as_slice())),
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["total_words"], 0);
    assert_eq!(body["result"]["match_percent"], 0.0);
}

#[tokio::test]
async fn test_analyze_rejections() {
    let app = setup();

    let unsupported = multipart(
        "/api/analyze",
        &[("topic", "Environment")],
        Some(("photo.png", b"\x89PNG".as_slice())),
    );
    let (status, body) = send(&app, unsupported).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["kind"], "unsupported_format");

    let undecodable = multipart(
        "/api/analyze",
        &[("topic", "Environment")],
        Some(("notes.txt", b"\xff\xfe\xfd".as_slice())),
    );
    let (status, _) = send(&app, undecodable).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let missing_topic = multipart("/api/analyze", &[], Some(("notes.txt", b"green".as_slice())));
    let (status, _) = send(&app, missing_topic).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown_topic = multipart(
        "/api/analyze",
        &[("topic", "Sports")],
        Some(("notes.txt", b"green".as_slice())),
    );
    let (status, _) = send(&app, unknown_topic).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let bad_policy = multipart(
        "/api/analyze",
        &[("topic", "Environment"), ("policy", "fuzzy")],
        Some(("notes.txt", b"green".as_slice())),
    );
    let (status, _) = send(&app, bad_policy).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let no_file = multipart("/api/analyze", &[("topic", "Environment")], None);
    let (status, _) = send(&app, no_file).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_classify_txt() {
    let app = setup();
    let request = multipart(
        "/api/classify",
        &[("k", "2")],
        Some(("essay.txt", b"sport sport and art".as_slice())),
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Top Topics");
    assert_eq!(body["topic"], "Sport");

    let result = body["result"].as_object().unwrap();
    assert_eq!(result.len(), 2);
    assert!(result.contains_key("Sport"));
    assert!(result.contains_key("Art"));
    for value in result.values() {
        assert!(value.as_str().unwrap().ends_with('%'));
    }
}

#[tokio::test]
async fn test_classify_defaults_to_configured_k() {
    let app = setup_with(|config| config.top_k = 1);
    let request = multipart("/api/classify", &[], Some(("essay.txt", b"music".as_slice())));
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"].as_object().unwrap().len(), 1);
    assert_eq!(body["topic"], "Music");
}

#[tokio::test]
async fn test_classify_blank_text_is_rejected() {
    let app = setup();
    let request = multipart("/api/classify", &[], Some(("blank.txt", b" \n\t ".as_slice())));
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "no_text");
    assert_eq!(body["error"], "No text found in the uploaded file.");
}

#[tokio::test]
async fn test_classify_bad_k() {
    let app = setup();
    let request = multipart(
        "/api/classify",
        &[("k", "-1")],
        Some(("essay.txt", b"sport".as_slice())),
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let app = setup_with(|config| config.max_upload_bytes = 256);
    let big = vec![b'a'; 4096];
    let request = multipart(
        "/api/analyze",
        &[("topic", "Environment")],
        Some(("big.txt", big.as_slice())),
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
