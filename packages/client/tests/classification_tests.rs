mod common;

use std::time::Duration;

use common::{config_for, dead_service, mock_router, spawn_service, Captured, PredictBehavior};
use vark_algo::{
    EngagementRecorder, EngagementSnapshot, Modality, QuestionnaireResponse, FALLBACK_CONFIDENCE,
};
use vark_client::predict::PredictError;
use vark_client::{classification_client, PredictClient, ResultSource};

fn answers() -> QuestionnaireResponse {
    // Visual 4, Auditory 2, Reading 2, Kinesthetic 2
    QuestionnaireResponse::from_indices([0, 1, 2, 3, 0, 1, 2, 3, 0, 0])
}

#[tokio::test]
async fn test_http_500_falls_back_to_local() {
    let base = spawn_service(mock_router(PredictBehavior::ServerError, Captured::default())).await;
    let client = classification_client(&config_for(&base, Duration::from_secs(5)));

    let result = client.classify(&EngagementSnapshot::default(), &answers()).await;

    assert_eq!(result.source, ResultSource::LocalFallback);
    assert_eq!(result.style, Modality::Visual);
    assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
    assert!(result.all_scores.is_empty());
    assert!(result.warning.as_deref().unwrap().contains("500"));
}

#[tokio::test]
async fn test_success_is_copied_verbatim() {
    let captured = Captured::default();
    let base = spawn_service(mock_router(PredictBehavior::Succeed, captured.clone())).await;
    let client = classification_client(&config_for(&base, Duration::from_secs(5)));

    let mut recorder = EngagementRecorder::new();
    recorder.on_modality_activate(Modality::Auditory, 0);
    recorder.flush_active(12_500);

    let result = client.classify(recorder.engagement(), &answers()).await;

    assert_eq!(result.source, ResultSource::Remote);
    assert_eq!(result.style, Modality::Auditory);
    assert_eq!(result.description, "remote description");
    assert_eq!(result.confidence, 0.71);
    assert_eq!(result.all_scores.len(), 4);
    assert_eq!(result.all_scores["Reading"], 0.12);
    assert!(result.warning.is_none());

    let bodies = captured.predict_bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["questionnaire"], serde_json::json!([0, 1, 2, 3, 0, 1, 2, 3, 0, 0]));
    assert_eq!(bodies[0]["engagement"]["auditory"]["clicks"], 1);
    assert_eq!(bodies[0]["engagement"]["auditory"]["timeSpent"], 12);
}

#[tokio::test]
async fn test_success_flag_false_falls_back_with_message() {
    let base = spawn_service(mock_router(PredictBehavior::Refuse, Captured::default())).await;
    let client = classification_client(&config_for(&base, Duration::from_secs(5)));

    let tied = QuestionnaireResponse::from_indices([3, 2, 3, 2]);
    let result = client.classify(&EngagementSnapshot::default(), &tied).await;

    assert_eq!(result.source, ResultSource::LocalFallback);
    assert_eq!(result.style, Modality::Reading);
    assert!(result.warning.as_deref().unwrap().contains("Model not loaded"));
}

#[tokio::test]
async fn test_timeout_falls_back() {
    let base = spawn_service(mock_router(
        PredictBehavior::Hang(Duration::from_secs(3)),
        Captured::default(),
    ))
    .await;
    let client = classification_client(&config_for(&base, Duration::from_millis(200)));

    let result = client.classify(&EngagementSnapshot::default(), &answers()).await;

    assert_eq!(result.source, ResultSource::LocalFallback);
    assert_eq!(result.style, Modality::Visual);
}

#[tokio::test]
async fn test_hung_service_reports_timeout_within_deadline() {
    let base = spawn_service(mock_router(
        PredictBehavior::Hang(Duration::from_secs(5)),
        Captured::default(),
    ))
    .await;
    let predict = PredictClient::new(&config_for(&base, Duration::from_millis(300)));

    let started = std::time::Instant::now();
    let err = predict
        .predict(&EngagementSnapshot::default(), &answers())
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "unexpected error {:?}", err);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_unreachable_service_falls_back() {
    let base = dead_service().await;
    let client = classification_client(&config_for(&base, Duration::from_secs(2)));

    let kinesthetic = QuestionnaireResponse::from_indices([3, 3, 3, 0, 1, 2, 3]);
    let result = client.classify(&EngagementSnapshot::default(), &kinesthetic).await;

    assert_eq!(result.source, ResultSource::LocalFallback);
    assert_eq!(result.style, Modality::Kinesthetic);
}

#[tokio::test]
async fn test_predict_error_variants() {
    let base = spawn_service(mock_router(PredictBehavior::ServerError, Captured::default())).await;
    let predict = PredictClient::new(&config_for(&base, Duration::from_secs(5)));

    match predict.predict(&EngagementSnapshot::default(), &answers()).await {
        Err(PredictError::HttpStatus { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert!(body.contains("model exploded"));
        }
        other => panic!("expected HTTP status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_health_check_reports_model_state() {
    let base = spawn_service(mock_router(PredictBehavior::Succeed, Captured::default())).await;
    let predict = PredictClient::new(&config_for(&base, Duration::from_secs(5)));

    let health = predict.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert!(health.model_loaded);

    let dead = PredictClient::new(&config_for(&dead_service().await, Duration::from_secs(1)));
    assert!(matches!(dead.health().await, Err(PredictError::Request(_))));
}
