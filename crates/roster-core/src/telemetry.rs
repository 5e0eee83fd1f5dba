//! Tracing initialization.
//!
//! Installs a `tracing` subscriber with an `EnvFilter`, a console layer in
//! pretty or JSON format, and (with the `telemetry` feature) an OpenTelemetry
//! layer exporting spans over OTLP.

#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "telemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "telemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler},
    Resource,
};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{RosterError, RosterResult};
use serde::{Deserialize, Serialize};

/// Console log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Base log level, used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Console output format.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Whether OpenTelemetry export is enabled.
    #[serde(default)]
    pub otlp_enabled: bool,

    /// Service name for tracing.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// OTLP endpoint URL (e.g., "http://localhost:4317").
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Sampling ratio (0.0 to 1.0).
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "roster".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            otlp_enabled: false,
            service_name: default_service_name(),
            otlp_endpoint: None,
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl TelemetryConfig {
    /// Filter directives applied when `RUST_LOG` is absent.
    #[must_use]
    pub fn default_directives(&self) -> String {
        format!("{},roster=debug,tower_http=debug", self.log_level)
    }
}

/// Initialize the global tracing subscriber.
pub fn init_tracing(config: &TelemetryConfig) -> RosterResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

    let console = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_target(true).boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(true).boxed(),
    };

    let registry = tracing_subscriber::registry().with(filter).with(console);

    #[cfg(feature = "telemetry")]
    let registry = registry.with(otlp_layer(config)?);

    registry
        .try_init()
        .map_err(|e| RosterError::Internal(format!("Failed to install tracing subscriber: {}", e)))?;

    tracing::info!(
        service_name = %config.service_name,
        log_format = ?config.log_format,
        otlp_enabled = config.otlp_enabled,
        "Tracing initialized"
    );

    Ok(())
}

/// Builds the OpenTelemetry layer, or `None` when export is disabled.
#[cfg(feature = "telemetry")]
fn otlp_layer<S>(
    config: &TelemetryConfig,
) -> RosterResult<Option<tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>>>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    if !config.otlp_enabled {
        return Ok(None);
    }

    let sampler = if config.sampling_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if config.sampling_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(config.sampling_ratio)
    };

    let resource = Resource::new(vec![KeyValue::new(SERVICE_NAME, config.service_name.clone())]);

    let builder = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_sampler(sampler)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource);

    let tracer_provider = match &config.otlp_endpoint {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()
                .map_err(|e| RosterError::Internal(format!("Failed to create OTLP exporter: {}", e)))?;
            builder.with_batch_exporter(exporter, runtime::Tokio).build()
        }
        None => builder.build(),
    };

    let tracer = tracer_provider.tracer("roster");
    opentelemetry::global::set_tracer_provider(tracer_provider);

    Ok(Some(tracing_opentelemetry::layer().with_tracer(tracer)))
}

/// Shutdown telemetry, flushing any pending spans.
#[cfg(feature = "telemetry")]
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Telemetry shutdown complete");
}

/// No-op when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn shutdown_telemetry() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert!(!config.otlp_enabled);
        assert_eq!(config.service_name, "roster");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.sampling_ratio, 1.0);
    }

    #[test]
    fn test_default_directives() {
        let config = TelemetryConfig {
            log_level: "warn".to_string(),
            ..TelemetryConfig::default()
        };
        assert_eq!(config.default_directives(), "warn,roster=debug,tower_http=debug");
    }

    #[test]
    fn test_log_format_deserializes_lowercase() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}
