use crate::{
    config::{Config, CorsConfig},
    detector::{DetectionParams, LabelDetector},
    routes::api_routes,
    telemetry::Metrics,
};
use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use axum_otel_metrics::HttpMetricsLayerBuilder;
use std::sync::Arc;
use tokio::{net::TcpListener, sync::broadcast::Receiver, task::JoinHandle};
use tower_http::{
    cors::{AllowCredentials, AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct SharedState {
    pub detector: Arc<dyn LabelDetector>,
    pub detection_params: DetectionParams,
    pub metrics: Arc<Metrics>,
}

impl SharedState {
    pub fn new(detector: Arc<dyn LabelDetector>, config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            detector,
            detection_params: DetectionParams::from(&config.rekognition),
            metrics: Arc::new(Metrics::new()?),
        })
    }
}

pub fn build_router(state: SharedState, config: &Config) -> anyhow::Result<Router> {
    let metrics_layer = HttpMetricsLayerBuilder::new().build();

    let router = Router::new()
        .merge(api_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(cors_layer(&config.cors)?)
        .layer(TraceLayer::new_for_http())
        .layer(metrics_layer);

    Ok(router)
}

/// Credentials are only granted to listed origins. Methods and headers are
/// mirrored from the preflight since `*` cannot be combined with credentials.
fn cors_layer(cors: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origins = cors
        .allowed_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;
    let credentialed = origins.clone();

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(AllowCredentials::predicate(move |origin, _| {
            credentialed.contains(origin)
        }))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new(detector: Arc<dyn LabelDetector>, config: &Config) -> anyhow::Result<Self> {
        let addr = config.server.get_address();

        let app_state = SharedState::new(detector, config)?;
        let router = build_router(app_state, config)?;

        let listener = TcpListener::bind(addr).await?;

        Ok(Self { router, listener })
    }

    pub async fn run(
        self,
        mut shutdown_rx: Receiver<()>,
    ) -> anyhow::Result<JoinHandle<anyhow::Result<()>>> {
        tracing::info!("Starting app on {}", self.listener.local_addr()?);

        let listener = self.listener;
        let router = self.router;
        let server_handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_rx.recv().await.ok();
                })
                .await?;
            Ok::<(), anyhow::Error>(())
        });

        Ok(server_handle)
    }
}
