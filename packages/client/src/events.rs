use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::classification::ClassificationResult;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum FlowEvent {
    #[serde(rename = "SESSION_STARTED")]
    SessionStarted(SessionStartedPayload),

    #[serde(rename = "QUESTIONNAIRE_STARTED")]
    QuestionnaireStarted(QuestionnaireStartedPayload),

    /// Navigation trigger for whoever presents the result.
    #[serde(rename = "CLASSIFICATION_COMPLETE")]
    ClassificationComplete(ClassificationCompletePayload),

    #[serde(rename = "SESSION_RESTARTED")]
    SessionRestarted(SessionRestartedPayload),
}

impl FlowEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            FlowEvent::SessionStarted(_) => "SESSION_STARTED",
            FlowEvent::QuestionnaireStarted(_) => "QUESTIONNAIRE_STARTED",
            FlowEvent::ClassificationComplete(_) => "CLASSIFICATION_COMPLETE",
            FlowEvent::SessionRestarted(_) => "SESSION_RESTARTED",
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            FlowEvent::SessionStarted(p) => &p.session_id,
            FlowEvent::QuestionnaireStarted(p) => &p.session_id,
            FlowEvent::ClassificationComplete(p) => &p.session_id,
            FlowEvent::SessionRestarted(p) => &p.session_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStartedPayload {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionnaireStartedPayload {
    pub session_id: String,
    pub explored_modalities: usize,
    pub question_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationCompletePayload {
    pub session_id: String,
    pub result: ClassificationResult,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRestartedPayload {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub id: String,
    pub event: FlowEvent,
    pub created_at: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn new(event: FlowEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event,
            created_at: Utc::now(),
        }
    }
}

type SubscriberId = String;

struct Subscriber {
    event_types: Vec<String>,
    sender: broadcast::Sender<EventEnvelope>,
}

pub struct EventBus {
    global_sender: broadcast::Sender<EventEnvelope>,
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,
    event_count: RwLock<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        let (global_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            global_sender,
            subscribers: RwLock::new(HashMap::new()),
            event_count: RwLock::new(0),
        }
    }

    pub async fn publish(&self, event: FlowEvent) {
        let envelope = EventEnvelope::new(event);
        let event_type = envelope.event.event_type();

        {
            let mut count = self.event_count.write().await;
            *count += 1;
        }

        let subscribers = self.subscribers.read().await;
        let mut sent_count = 0usize;
        for subscriber in subscribers.values() {
            if subscriber.event_types.iter().any(|t| t == event_type)
                && subscriber.sender.send(envelope.clone()).is_ok()
            {
                sent_count += 1;
            }
        }

        if self.global_sender.send(envelope.clone()).is_err() {
            debug!("No global subscribers for event");
        }

        debug!(
            event_type = event_type,
            session_id = envelope.event.session_id(),
            sent_to = sent_count,
            "Event published"
        );
    }

    pub fn subscribe_global(&self) -> broadcast::Receiver<EventEnvelope> {
        self.global_sender.subscribe()
    }

    /// Receives only the listed event types, e.g. `["CLASSIFICATION_COMPLETE"]`.
    pub async fn subscribe_filtered(
        &self,
        event_types: Vec<String>,
    ) -> (SubscriberId, broadcast::Receiver<EventEnvelope>) {
        let (sender, receiver) = broadcast::channel(CHANNEL_CAPACITY);
        let subscriber_id = uuid::Uuid::new_v4().to_string();

        {
            let mut subscribers = self.subscribers.write().await;
            subscribers.insert(
                subscriber_id.clone(),
                Subscriber {
                    event_types,
                    sender,
                },
            );
        }

        debug!(subscriber_id = %subscriber_id, "New filtered subscription created");
        (subscriber_id, receiver)
    }

    pub async fn unsubscribe(&self, subscriber_id: &str) {
        let mut subscribers = self.subscribers.write().await;
        if subscribers.remove(subscriber_id).is_some() {
            debug!(subscriber_id = %subscriber_id, "Subscription removed");
        }
    }

    pub async fn event_count(&self) -> u64 {
        *self.event_count.read().await
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
