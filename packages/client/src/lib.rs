//! Async side of the VARK discovery flow: remote prediction with local
//! fallback, the exploration session context, flow events and scripted
//! replay.

pub mod classification;
pub mod config;
pub mod events;
pub mod predict;
pub mod replay;
pub mod session;

pub use classification::{ClassificationClient, ClassificationResult, ResultSource};
pub use config::Config;
pub use events::{EventBus, EventEnvelope, FlowEvent};
pub use predict::{PredictClient, PredictError};
pub use session::ExplorationSession;

/// Classification client wired from configuration.
pub fn classification_client(config: &Config) -> ClassificationClient {
    ClassificationClient::new(PredictClient::new(config))
}
