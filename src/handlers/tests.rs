//! Router-level tests
//!
//! Drive the real router with a fixed-output classifier.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use ndarray::ArrayView3;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::assets::{Assets, ModelInfo};
use crate::classifier::{
    ClassLabels, Classifier, InferenceError, InferenceService, NormalizationStats,
};
use crate::config::Config;
use crate::{create_router, AppState};

enum Behaviour {
    Output(Vec<f32>),
    Fail(&'static str),
    Panic,
}

struct FakeClassifier(Behaviour);

impl Classifier for FakeClassifier {
    fn predict(&self, _input: ArrayView3<'_, f32>) -> Result<Vec<f32>, InferenceError> {
        match &self.0 {
            Behaviour::Output(v) => Ok(v.clone()),
            Behaviour::Fail(msg) => Err(InferenceError(msg.to_string())),
            Behaviour::Panic => panic!("runtime exploded"),
        }
    }

    fn num_classes(&self) -> Option<usize> {
        None
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

fn app(behaviour: Behaviour) -> Router {
    let classes = vec!["walking".to_string(), "running".to_string(), "sitting".to_string()];
    let service = InferenceService::new(
        Box::new(FakeClassifier(behaviour)),
        NormalizationStats::new(vec![0.0; 6], vec![1.0; 6]).unwrap(),
        ClassLabels::new(classes.clone()).unwrap(),
    ).unwrap();

    let info = ModelInfo {
        path: "fake.onnx".to_string(),
        sha256: "00".repeat(32),
        input_shape: vec![1, 100, 6],
        classes,
        loaded_at: chrono::Utc::now(),
    };

    create_router(AppState::new(Assets { service, info }, Config::default()))
}

fn window(timesteps: usize, channels: usize) -> Value {
    json!(vec![vec![0.25f64; channels]; timesteps])
}

async fn post_predict(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::post("/predict")
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn body_of(value: Value) -> String {
    value.to_string()
}

#[tokio::test]
async fn test_predict_success() {
    let (status, body) = post_predict(
        app(Behaviour::Output(vec![0.1, 0.7, 0.2])),
        body_of(json!({ "sensor_data": window(100, 6) })),
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "running");
    assert_eq!(body["confidence"].as_f64().unwrap() as f32, 0.7);

    let all = body["all_probabilities"].as_object().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all["walking"].as_f64().unwrap() as f32, 0.1);
    assert_eq!(all["sitting"].as_f64().unwrap() as f32, 0.2);
}

#[tokio::test]
async fn test_predict_is_idempotent() {
    let app = app(Behaviour::Output(vec![0.2, 0.3, 0.5]));
    let request = body_of(json!({ "sensor_data": window(100, 6) }));

    let first = post_predict(app.clone(), request.clone()).await;
    let second = post_predict(app, request).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_sensor_data() {
    let (status, body) = post_predict(
        app(Behaviour::Output(vec![0.1, 0.7, 0.2])),
        body_of(json!({ "readings": [] })),
    ).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Expected 'sensor_data' array in JSON");
}

#[tokio::test]
async fn test_wrong_shape_reports_expected_and_actual() {
    for (timesteps, channels) in [(99, 6), (100, 5)] {
        let (status, body) = post_predict(
            app(Behaviour::Output(vec![0.1, 0.7, 0.2])),
            body_of(json!({ "sensor_data": window(timesteps, channels) })),
        ).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            format!("Invalid shape. Expected (100, 6), got ({}, {})", timesteps, channels)
        );
        assert!(body["hint"].as_str().unwrap().contains("acc_x,acc_y,acc_z,gyro_x,gyro_y,gyro_z"));
    }
}

#[tokio::test]
async fn test_malformed_json_is_an_error_response() {
    let (status, body) = post_predict(
        app(Behaviour::Output(vec![0.1, 0.7, 0.2])),
        "{ not json",
    ).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Malformed JSON body"));
}

#[tokio::test]
async fn test_inference_failure_is_500() {
    let (status, body) = post_predict(
        app(Behaviour::Fail("shape mismatch inside graph")),
        body_of(json!({ "sensor_data": window(100, 6) })),
    ).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("shape mismatch inside graph"));
}

#[tokio::test]
async fn test_inference_panic_is_500_and_server_keeps_serving() {
    let (status, body) = post_predict(
        app(Behaviour::Panic),
        body_of(json!({ "sensor_data": window(100, 6) })),
    ).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, _) = post_predict(
        app(Behaviour::Output(vec![0.1, 0.7, 0.2])),
        body_of(json!({ "sensor_data": window(100, 6) })),
    ).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_output_length_is_500() {
    let (status, body) = post_predict(
        app(Behaviour::Output(vec![0.5, 0.5])),
        body_of(json!({ "sensor_data": window(100, 6) })),
    ).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("2 probabilities for 3 classes"));
}

#[tokio::test]
async fn test_health_reports_model() {
    let response = app(Behaviour::Output(vec![0.1, 0.7, 0.2]))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"]["classes"], json!(["walking", "running", "sitting"]));
    assert_eq!(body["model"]["input_shape"], json!([1, 100, 6]));
}
