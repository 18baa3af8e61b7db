// Framework bootstrap for the command-line view reporter.

use std::io::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::domain::cookie::CookieOptions;
use crate::domain::ports::FingerprintLoader;
use crate::frameworks::config;
use crate::interface_adapters::clients::ViewsClient;
use crate::interface_adapters::clock::SystemClock;
use crate::interface_adapters::cookies::CookieJar;
use crate::interface_adapters::fingerprint::{AttributeFingerprinter, DeviceAttributes};
use crate::use_cases::{
    ExecutionContext, FingerprintCache, GuestCookie, GuestIdentifierResolver, TrackerSettings,
    ViewTracker,
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub graphql_endpoint: Url,
    pub graphql_timeout: Duration,
    pub dwell: Duration,
    pub production: bool,
    pub cookie_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let graphql_endpoint = config::graphql_endpoint()
            .inspect_err(|e| tracing::error!(error = %e, "invalid configuration"))
            .map_err(std::io::Error::other)?;
        Ok(Self {
            graphql_endpoint,
            graphql_timeout: config::graphql_timeout(),
            dwell: config::view_dwell(),
            production: config::is_production(),
            cookie_file: config::cookie_file(),
        })
    }
}

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn views_client(config: &AppConfig) -> Result<ViewsClient> {
    let views = ViewsClient::new(config.graphql_endpoint.clone(), config.graphql_timeout)
        .inspect_err(|e| tracing::error!(error = %e, "failed to initialize views client"))
        .map_err(|e| std::io::Error::other(format!("failed to initialize views client: {e}")))?;
    tracing::debug!(
        graphql_endpoint = %config.graphql_endpoint,
        graphql_timeout_ms = config.graphql_timeout.as_millis(),
        dwell_ms = config.dwell.as_millis(),
        "views client configured"
    );
    Ok(views)
}

/// Reports one view of `content_id` and waits for the attempt to finish.
pub async fn run(config: AppConfig, content_id: String) -> Result<()> {
    let jar = CookieJar::open(&config.cookie_file, SystemClock)
        .inspect_err(|e| {
            tracing::error!(path = %config.cookie_file.display(), error = %e, "failed to open cookie jar")
        })
        .map_err(std::io::Error::other)?;

    let fingerprints = FingerprintCache::global(|| {
        Arc::new(AttributeFingerprinter::new(DeviceAttributes::from_host()))
            as Arc<dyn FingerprintLoader>
    });
    let resolver = Arc::new(GuestIdentifierResolver::new(
        ExecutionContext::Browser,
        GuestCookie::new(jar, CookieOptions::guest(config.production)),
        fingerprints,
    ));

    let views = views_client(&config)?;

    let mut tracker = ViewTracker::new(
        content_id,
        resolver,
        Arc::new(views),
        TrackerSettings {
            dwell: config.dwell,
        },
    );
    tracing::info!(content_id = %tracker.content_id(), "waiting for dwell time");
    tracker.track();
    tracker.settled().await;
    tracker.unmount();

    Ok(())
}

pub async fn run_with_config(content_id: String) -> Result<()> {
    init_runtime();
    let config = AppConfig::from_env()?;
    run(config, content_id).await
}
