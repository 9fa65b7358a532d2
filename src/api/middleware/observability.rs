//! Observability middleware.
//!
//! Structured logging via tracing; an OTLP exporter can be layered on top
//! without touching this module's callers.

use std::env;
use tracing::info;

/// Initialize observability.
///
/// Checks for OTEL_SERVICE_NAME and OTEL_EXPORTER_OTLP_ENDPOINT environment
/// variables. If not set, uses basic tracing without OpenTelemetry.
pub async fn init_observability() -> Result<(), Box<dyn std::error::Error>> {
    let service_name = env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "forms-api".to_string());

    let otlp_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

    if otlp_endpoint.is_some() {
        info!(
            "OpenTelemetry endpoint configured for service_name={} but SDK not initialized - using basic tracing",
            service_name
        );
    } else {
        info!(
            "Observability initialized (OpenTelemetry disabled - set OTEL_EXPORTER_OTLP_ENDPOINT to enable)"
        );
    }

    Ok(())
}
