//! Router tests with fake metadata and model stages.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use tubesort_cli::{AppState, PREDICTION_FAILED, build_router};
use tubesort_core::{
    Classify, ClassifyError, ExtractError, Labels, Predictor, Preprocess, SEQUENCE_LEN,
    TitleSequence, TitleSource, VideoLink,
};

/// Serves titles keyed by video id; unknown ids behave like a 404.
struct FakeMetadata;

#[async_trait]
impl TitleSource for FakeMetadata {
    async fn fetch_title(&self, link: &VideoLink) -> Result<String, ExtractError> {
        match link.video_id() {
            "abc123" => Ok("Intro to Algorithms".into()),
            "cats" => Ok("Funny <cats> compilation".into()),
            "broken" => Ok("model breaks on this".into()),
            "odd" => Ok("three way".into()),
            _ => Err(ExtractError::Status { status: 404 }),
        }
    }
}

/// One token per known title so the fake model can tell them apart.
struct TitleTablePreprocessor;

impl Preprocess for TitleTablePreprocessor {
    fn preprocess(&self, title: &str) -> TitleSequence {
        let id = match title {
            "Intro to Algorithms" => 1,
            "Funny <cats> compilation" => 2,
            "three way" => 3,
            _ => 4,
        };
        TitleSequence::from_token_ids(&[id], SEQUENCE_LEN)
    }
}

#[derive(Default)]
struct FakeModel {
    calls: AtomicUsize,
}

impl Classify for FakeModel {
    fn classify(&self, seq: &TitleSequence) -> Result<Vec<f32>, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match seq.as_slice()[SEQUENCE_LEN - 1] {
            1 => Ok(vec![0.9, 0.1]),
            2 => Ok(vec![0.2, 0.8]),
            // Wider than the label list.
            3 => Ok(vec![0.1, 0.2, 0.7]),
            _ => Err(ClassifyError::Inference("boom".into())),
        }
    }
}

fn app(model: Arc<FakeModel>) -> (axum::Router, AppState) {
    let predictor = Predictor::new(
        Arc::new(FakeMetadata),
        Arc::new(TitleTablePreprocessor),
        model,
        Labels::default(),
    );
    let state = AppState::new(predictor, 3);
    (build_router(state.clone()), state)
}

fn form_post(link: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("video_link={}", urlencode(link))))
        .unwrap()
}

fn json_post(link: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::json!({ "video_link": link }).to_string()))
        .unwrap()
}

fn urlencode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn get_renders_empty_form() {
    let (app, _) = app(Arc::default());
    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));

    let html = body_text(resp).await;
    assert!(html.contains("name=\"video_link\""));
    assert!(!html.contains("Predicted category"));
}

#[tokio::test]
async fn post_renders_prediction() {
    let (app, _) = app(Arc::default());
    let resp = app
        .oneshot(form_post("https://youtube.com/watch?v=abc123"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("<span id=\"prediction\">Education</span>"));
    assert!(html.contains("[0.9000, 0.1000]"));
    assert!(html.contains("<span id=\"video-title\">Intro to Algorithms</span>"));
    assert!(html.contains("https://youtube.com/watch?v=abc123"));
}

#[tokio::test]
async fn post_escapes_title() {
    let (app, _) = app(Arc::default());
    let resp = app.oneshot(form_post("watch?v=cats")).await.unwrap();
    let html = body_text(resp).await;
    assert!(html.contains("Entertainment"));
    assert!(html.contains("Funny &lt;cats&gt; compilation"));
}

#[tokio::test]
async fn extraction_failure_skips_model() {
    let model = Arc::new(FakeModel::default());
    let (app, _) = app(Arc::clone(&model));
    let resp = app.oneshot(form_post("watch?v=missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Failed to extract video title"));
    assert!(!html.contains("raw-prediction"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn classification_failure_is_generic_message() {
    let (app, _) = app(Arc::default());
    let resp = app.oneshot(form_post("watch?v=broken")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, PREDICTION_FAILED);
}

#[tokio::test]
async fn missing_field_is_rejected() {
    let (app, _) = app(Arc::default());
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("other=1"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn history_is_recorded_and_bounded() {
    let (app, state) = app(Arc::default());
    for link in ["watch?v=abc123", "watch?v=missing", "watch?v=cats", "watch?v=abc123"] {
        let resp = app.clone().oneshot(form_post(link)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let history = state.history.snapshot().await;
    let links: Vec<&str> = history.iter().map(|e| e.link.as_str()).collect();
    assert_eq!(links, vec!["watch?v=missing", "watch?v=cats", "watch?v=abc123"]);

    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = body_text(resp).await;
    assert!(html.contains("watch?v=missing"));
    assert!(html.contains("watch?v=cats"));
}

#[tokio::test]
async fn api_predict_classified() {
    let (app, _) = app(Arc::default());
    let resp = app
        .oneshot(json_post("https://youtube.com/watch?v=abc123"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(json["status"], "classified");
    assert_eq!(json["label"], "Education");
    assert_eq!(json["title"], "Intro to Algorithms");
    assert_eq!(json["probabilities"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn api_predict_unknown_label() {
    let (app, _) = app(Arc::default());
    let resp = app.oneshot(json_post("watch?v=odd")).await.unwrap();

    let json: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(json["status"], "classified");
    assert_eq!(json["label"], "Unknown");
}

#[tokio::test]
async fn api_predict_extraction_failed() {
    let (app, _) = app(Arc::default());
    let resp = app.oneshot(json_post("watch?v=missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(json["status"], "extraction_failed");
    assert_eq!(json["message"], "Failed to extract video title");
}

#[tokio::test]
async fn api_predict_classification_failed() {
    let (app, _) = app(Arc::default());
    let resp = app.oneshot(json_post("watch?v=broken")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(json["error"]["code"], "PREDICTION_FAILED");
    assert_eq!(json["error"]["message"], PREDICTION_FAILED);
}

#[tokio::test]
async fn api_predict_rejects_blank_link() {
    let (app, state) = app(Arc::default());
    let resp = app.oneshot(json_post("   ")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(state.history.is_empty().await);
}

#[tokio::test]
async fn health_reports_history() {
    let (app, _) = app(Arc::default());
    let resp = app.clone().oneshot(form_post("watch?v=abc123")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["history_len"], 1);
}
