#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use vark_client::config::Config;

/// Request bodies seen by the mock service, per endpoint.
#[derive(Clone, Default)]
pub struct Captured {
    pub predict: Arc<Mutex<Vec<Value>>>,
    pub saved: Arc<Mutex<Vec<Value>>>,
}

impl Captured {
    pub fn predict_bodies(&self) -> Vec<Value> {
        self.predict.lock().unwrap().clone()
    }

    pub fn saved_bodies(&self) -> Vec<Value> {
        self.saved.lock().unwrap().clone()
    }
}

#[derive(Clone, Copy)]
pub enum PredictBehavior {
    Succeed,
    ServerError,
    Refuse,
    Hang(Duration),
}

pub fn success_payload() -> Value {
    json!({
        "success": true,
        "predicted_style": "Auditory",
        "confidence": 0.71,
        "all_scores": {"Visual": 0.09, "Auditory": 0.71, "Reading": 0.12, "Kinesthetic": 0.08},
        "timestamp": "2024-05-01T10:00:00",
        "description": "remote description"
    })
}

pub fn mock_router(behavior: PredictBehavior, captured: Captured) -> Router {
    let predict = move |State(captured): State<Captured>, Json(body): Json<Value>| async move {
        captured.predict.lock().unwrap().push(body);
        match behavior {
            PredictBehavior::Succeed => (StatusCode::OK, Json(success_payload())),
            PredictBehavior::ServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "model exploded", "success": false})),
            ),
            PredictBehavior::Refuse => (
                StatusCode::OK,
                Json(json!({"error": "Model not loaded", "success": false})),
            ),
            PredictBehavior::Hang(delay) => {
                tokio::time::sleep(delay).await;
                (StatusCode::OK, Json(success_payload()))
            }
        }
    };

    let save = |State(captured): State<Captured>, Json(body): Json<Value>| async move {
        captured.saved.lock().unwrap().push(body);
        Json(json!({
            "success": true,
            "message": "Engagement data received",
            "timestamp": "2024-05-01T10:00:00"
        }))
    };

    let health = || async {
        Json(json!({"status": "healthy", "timestamp": "2024-05-01T10:00:00", "model_loaded": true}))
    };

    Router::new()
        .route("/api/predict", post(predict))
        .route("/api/save-engagement", post(save))
        .route("/api/health", get(health))
        .with_state(captured)
}

/// Serves `router` on an ephemeral localhost port and returns the API base URL.
pub async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

/// A base URL nothing listens on.
pub async fn dead_service() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

pub fn config_for(api_base: &str, timeout: Duration) -> Config {
    Config {
        api_base: api_base.to_string(),
        predict_timeout: timeout,
        ..Config::default()
    }
}
