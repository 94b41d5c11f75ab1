use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vark_client::config::Config;
use vark_client::replay::{self, ReplayScript};
use vark_client::{classification_client, EventBus};

/// Replays a recorded exploration session and prints the classification.
#[derive(Parser, Debug)]
#[command(name = "vark-replay")]
#[command(about = "Replay a VARK exploration script and classify it")]
#[command(version)]
struct Args {
    /// JSON script of interaction events and questionnaire answers
    script: PathBuf,

    /// Base URL of the prediction service
    #[arg(long, env = "VARK_API_BASE")]
    api_base: Option<String>,

    /// Probe the service health endpoint before classifying
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(base) = args.api_base {
        config.api_base = base.trim_end_matches('/').to_string();
    }
    let _log_guard = init_tracing(&config);

    let script = match ReplayScript::load(&args.script).await {
        Ok(script) => script,
        Err(e) => {
            tracing::error!(error = %e, path = %args.script.display(), "failed to load script");
            return ExitCode::FAILURE;
        }
    };

    let classifier = classification_client(&config);
    if args.health {
        match classifier.predict_client().health().await {
            Ok(health) => tracing::info!(
                status = %health.status,
                model_loaded = health.model_loaded,
                "prediction service reachable"
            ),
            Err(e) => tracing::warn!(error = %e, "prediction service health check failed"),
        }
    }

    let bus = Arc::new(EventBus::new());
    let outcome = tokio::select! {
        outcome = replay::run(&script, classifier, bus) => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted before classification finished");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            return ExitCode::FAILURE;
        }
    };

    if let Some(warning) = &outcome.result.warning {
        tracing::warn!("{warning}");
    }

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to encode outcome");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so the JSON on stdout stays machine-readable. The
/// returned guard flushes the file writer and must live until exit.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    let registry = tracing_subscriber::registry().with(env_filter).with(stderr_layer);

    let Some(log_dir) = config.log_dir.as_ref() else {
        registry.init();
        return None;
    };

    if let Err(err) = std::fs::create_dir_all(log_dir) {
        registry.init();
        tracing::warn!(error = %err, dir = %log_dir.display(), "file logging disabled");
        return None;
    }

    let (file_writer, guard) =
        tracing_appender::non_blocking(RollingFileAppender::new(Rotation::DAILY, log_dir, "vark-replay.log"));
    registry
        .with(fmt::layer().with_writer(file_writer).with_ansi(false).with_target(true))
        .init();
    Some(guard)
}
