mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{config_for, dead_service, mock_router, spawn_service, Captured, PredictBehavior};
use vark_algo::{Modality, QuestionBank, QuestionnaireError};
use vark_client::session::KIDS_MIN_EXPLORED;
use vark_client::{classification_client, EventBus, ExplorationSession, FlowEvent, ResultSource};

async fn session_against(base: &str, save_on_exit: bool) -> (ExplorationSession, Arc<EventBus>) {
    let bus = Arc::new(EventBus::new());
    let client = classification_client(&config_for(base, Duration::from_secs(5)));
    let session =
        ExplorationSession::start(QuestionBank::quick(), client, Arc::clone(&bus), save_on_exit).await;
    (session, bus)
}

#[tokio::test]
async fn test_submission_classifies_and_emits_navigation_trigger() {
    let captured = Captured::default();
    let base = spawn_service(mock_router(PredictBehavior::Succeed, captured.clone())).await;
    let (mut session, bus) = session_against(&base, false).await;
    let (_, mut rx) = bus
        .subscribe_filtered(vec!["CLASSIFICATION_COMPLETE".to_string()])
        .await;

    session.recorder_mut().on_modality_activate(Modality::Visual, 0);
    session.begin_questionnaire(4_000).await;

    for option in [1, 1, 0] {
        session.select_option(option).unwrap();
        let outcome = session.advance(4_000).await.unwrap();
        if option == 0 {
            let result = outcome.expect("last answer submits");
            assert_eq!(result.source, ResultSource::Remote);
        }
    }

    let envelope = rx.recv().await.unwrap();
    match envelope.event {
        FlowEvent::ClassificationComplete(payload) => {
            assert_eq!(payload.session_id, session.id());
            assert_eq!(payload.result.style, Modality::Auditory);
        }
        other => panic!("unexpected event {:?}", other),
    }

    assert_eq!(session.result().map(|r| r.style), Some(Modality::Auditory));
    let bodies = captured.predict_bodies();
    assert_eq!(bodies[0]["questionnaire"], serde_json::json!([1, 1, 0]));
    assert_eq!(bodies[0]["engagement"]["visual"]["timeSpent"], 4);
}

#[tokio::test]
async fn test_active_clock_is_flushed_before_classification() {
    let captured = Captured::default();
    let base = spawn_service(mock_router(PredictBehavior::Succeed, captured.clone())).await;
    let (mut session, _bus) = session_against(&base, false).await;

    session.recorder_mut().on_modality_activate(Modality::Reading, 0);
    for _ in 0..3 {
        session.select_option(2).unwrap();
        session.advance(9_000).await.unwrap();
    }

    let bodies = captured.predict_bodies();
    assert_eq!(bodies[0]["engagement"]["reading"]["timeSpent"], 9);
}

#[tokio::test]
async fn test_questionnaire_time_is_not_credited_to_last_modality() {
    let captured = Captured::default();
    let base = spawn_service(mock_router(PredictBehavior::Succeed, captured.clone())).await;
    let (mut session, _bus) = session_against(&base, false).await;

    session.recorder_mut().on_modality_activate(Modality::Visual, 0);
    session.recorder_mut().on_audio_play(2_000);
    session.begin_questionnaire(10_000).await;

    for (option, now_ms) in [(0, 30_000), (1, 50_000), (2, 70_000)] {
        session.select_option(option).unwrap();
        session.advance(now_ms).await.unwrap();
    }

    let bodies = captured.predict_bodies();
    assert_eq!(bodies[0]["engagement"]["visual"]["timeSpent"], 10);
    assert_eq!(bodies[0]["engagement"]["auditory"]["audioTimeListened"], 8);
    assert_eq!(session.recorder().active(), None);
}

#[tokio::test]
async fn test_advance_without_selection_blocks() {
    let (mut session, _bus) = session_against(&dead_service().await, false).await;
    assert_eq!(
        session.advance(0).await.unwrap_err(),
        QuestionnaireError::NoSelection
    );
    assert!(session.result().is_none());
    assert!(session.classify(0).await.is_none());
}

#[tokio::test]
async fn test_fallback_flow_still_reaches_result() {
    let (mut session, _bus) = session_against(&dead_service().await, false).await;

    for option in [3, 3, 1] {
        session.select_option(option).unwrap();
        session.advance(1_000).await.unwrap();
    }

    let result = session.result().unwrap();
    assert_eq!(result.source, ResultSource::LocalFallback);
    assert_eq!(result.style, Modality::Kinesthetic);
    assert!(result.warning.is_some());
    assert_eq!(session.features().answer_counts, [0, 1, 0, 2]);
}

#[tokio::test]
async fn test_can_continue_after_two_activities() {
    let (mut session, _bus) = session_against(&dead_service().await, false).await;
    assert!(!session.can_continue(KIDS_MIN_EXPLORED));

    session.recorder_mut().on_modality_activate(Modality::Visual, 0);
    session.recorder_mut().on_modality_activate(Modality::Visual, 100);
    assert!(!session.can_continue(KIDS_MIN_EXPLORED));

    session.recorder_mut().on_modality_activate(Modality::Kinesthetic, 200);
    assert!(session.can_continue(KIDS_MIN_EXPLORED));
}

#[tokio::test]
async fn test_exit_hook_saves_when_enabled() {
    let captured = Captured::default();
    let base = spawn_service(mock_router(PredictBehavior::Succeed, captured.clone())).await;
    let (mut session, _bus) = session_against(&base, true).await;

    session.recorder_mut().on_modality_activate(Modality::Auditory, 0);
    let handle = session.exit_hook(7_000).expect("save task spawned");
    handle.await.unwrap();

    let saved = captured.saved_bodies();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["engagement"]["auditory"]["timeSpent"], 7);
    assert_eq!(saved[0]["firstInteraction"], "auditory");
    assert_eq!(session.recorder().active(), Some(Modality::Auditory));
}

#[tokio::test]
async fn test_exit_hook_disabled_only_flushes() {
    let (mut session, _bus) = session_against(&dead_service().await, false).await;
    session.recorder_mut().on_modality_activate(Modality::Visual, 0);

    assert!(session.exit_hook(3_000).is_none());
    assert_eq!(session.telemetry().engagement.visual.common.time_spent, 3);
}

#[tokio::test]
async fn test_restart_discards_session_state() {
    let (mut session, bus) = session_against(&dead_service().await, false).await;
    let mut rx = bus.subscribe_global();
    let first_id = session.id().to_string();

    session.recorder_mut().on_modality_activate(Modality::Visual, 0);
    for _ in 0..3 {
        session.select_option(0).unwrap();
        session.advance(2_000).await.unwrap();
    }
    assert!(session.result().is_some());

    session.restart().await;

    assert_ne!(session.id(), first_id);
    assert!(session.result().is_none());
    assert_eq!(session.telemetry().engagement.visual.common.clicks, 0);
    assert_eq!(session.questionnaire().answered_count(), 0);

    let mut restarted = None;
    while let Ok(envelope) = rx.try_recv() {
        if let FlowEvent::SessionRestarted(payload) = envelope.event {
            restarted = Some(payload.session_id);
        }
    }
    assert_eq!(restarted.as_deref(), Some(first_id.as_str()));
}
