use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use chrono::Utc;
use reqwest::Client;
use tokio::{net::TcpListener, task::JoinHandle, time::timeout};

use crate::{
    admission::{spawn_sweeper, AdmissionController},
    ai::{
        CachedSynthesizer, ChatClassifier, FallbackClassifier, SpeechClient, Synthesizer,
        Transcriber,
    },
    classify::{IntentEngine, SpamEngine},
    config::AppConfig,
    http::{build_router, ApiState},
    infrastructure::shutdown::Shutdown,
};

pub struct VoicemailApp {
    config: Arc<AppConfig>,
    router: Router,
    admission: Arc<AdmissionController>,
    shutdown: Shutdown,
}

impl VoicemailApp {
    pub fn initialize(config: AppConfig, shutdown: Shutdown) -> Result<Self> {
        let config = Arc::new(config);

        let http_client = Client::builder()
            .user_agent(format!("voicemail-ai/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        let fallback: Option<Arc<dyn FallbackClassifier>> =
            match ChatClassifier::from_config(http_client.clone(), &config.classifier) {
                Some(classifier) => {
                    tracing::info!(
                        target: "classifier",
                        model = %config.classifier.model,
                        "fallback classifier enabled"
                    );
                    Some(Arc::new(classifier))
                }
                None => {
                    tracing::warn!(
                        target: "classifier",
                        "AI_API_KEY not set; classification runs on rules only"
                    );
                    None
                }
            };

        let speech = SpeechClient::from_config(http_client, &config.speech);
        if speech.is_none() {
            tracing::warn!(
                target: "speech",
                "SPEECH_API_KEY not set; audio endpoints will answer 503"
            );
        }
        let transcriber = speech
            .clone()
            .map(|client| Arc::new(client) as Arc<dyn Transcriber>);
        let synthesizer =
            speech.map(|client| Arc::new(CachedSynthesizer::new(client)) as Arc<dyn Synthesizer>);

        let admission = Arc::new(AdmissionController::new(&config.admission));
        let state = ApiState {
            admission: admission.clone(),
            intents: IntentEngine::new(fallback.clone()),
            spam: SpamEngine::new(fallback, config.classifier.spam_max_chars),
            transcriber,
            synthesizer,
            started_at: Utc::now(),
        };
        let router = build_router(Arc::new(state), &config.server);

        Ok(Self {
            config,
            router,
            admission,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let VoicemailApp {
            config,
            router,
            admission,
            shutdown,
        } = self;

        let addr = format!("{}:{}", config.server.bind_host, config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        tracing::info!(
            target: "http",
            addr = %addr,
            window_secs = config.admission.window.as_secs(),
            max_requests = config.admission.max_requests,
            "voicemail-ai listening"
        );

        let sweeper = spawn_sweeper(admission, shutdown.subscribe());

        let mut stop = shutdown.subscribe();
        let served = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { stop.notified().await })
        .await;

        shutdown.trigger();
        stop_sweeper(sweeper, Duration::from_secs(5)).await;

        served.context("http server terminated with an error")?;
        tracing::info!("shutdown complete");
        Ok(())
    }
}

async fn stop_sweeper(mut handle: JoinHandle<()>, grace: Duration) {
    match timeout(grace, &mut handle).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) if err.is_panic() => {
            tracing::error!(target: "admission", "admission sweeper panicked");
        }
        Ok(Err(_)) => {}
        Err(_) => {
            tracing::warn!(
                target: "admission",
                "admission sweeper did not stop within {:?}; aborting",
                grace
            );
            handle.abort();
        }
    }
}
