use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    trace::{Sampler, SdkTracerProvider},
    Resource,
};
use std::env;
use tracing::info;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,hyper=warn,tower=warn,h2=error,aws_smithy_runtime=warn";
const DEFAULT_SERVICE_NAME: &str = "agents-gateway";

pub fn is_lambda() -> bool {
    env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok()
}

/// Install the global subscriber: JSON logs for CloudWatch, plus an OTLP
/// span exporter when OTEL_ENABLED (defaults on inside Lambda).
pub fn init_tracing() {
    let in_lambda = is_lambda();

    let enable_otel = env::var("OTEL_ENABLED")
        .unwrap_or_else(|_| if in_lambda { "true" } else { "false" }.to_string())
        == "true";

    // localhost does not always resolve inside the Lambda sandbox
    let otel_endpoint = if in_lambda {
        "http://127.0.0.1:4318/v1/traces".to_string()
    } else {
        env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4318/v1/traces".to_string())
    };

    let fmt_layer = if enable_otel {
        fmt::layer().json().with_target(false).boxed()
    } else {
        fmt::layer()
            .json()
            .with_target(false)
            .with_span_events(fmt::format::FmtSpan::CLOSE)
            .boxed()
    };

    let subscriber = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)));

    if !enable_otel {
        subscriber.init();
        return;
    }

    let rate = sampling_rate(env::var("OTEL_TRACE_SAMPLING_RATE").ok());

    match init_opentelemetry(&otel_endpoint, rate) {
        Ok(provider) => {
            opentelemetry::global::set_tracer_provider(provider.clone());
            let tracer = provider.tracer(DEFAULT_SERVICE_NAME);

            subscriber.with(OpenTelemetryLayer::new(tracer)).init();

            info!("OpenTelemetry enabled: {}", otel_endpoint);
            info!("OpenTelemetry sampling rate: {}%", rate * 100.0);
        }
        Err(e) => {
            subscriber.init();
            tracing::error!("Failed to initialize OpenTelemetry: {}. Continuing with logs only.", e);
        }
    }
}

/// Sampling ratio from OTEL_TRACE_SAMPLING_RATE, default 1%
fn sampling_rate(raw: Option<String>) -> f64 {
    raw.and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.01)
        .clamp(0.0, 1.0)
}

fn init_opentelemetry(
    endpoint: &str,
    rate: f64,
) -> Result<SdkTracerProvider, Box<dyn std::error::Error>> {
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    let service_name =
        env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

    let resource = Resource::builder()
        .with_attribute(KeyValue::new("service.name", service_name))
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    // ADOT's Lambda layer only accepts OTLP/HTTP on 4318
    let exporter = if uses_grpc(env::var("OTEL_EXPORTER_OTLP_PROTOCOL").ok().as_deref()) {
        SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?
    } else {
        SpanExporter::builder()
            .with_http()
            .with_endpoint(endpoint)
            .build()?
    };

    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::TraceIdRatioBased(rate))
        .with_batch_exporter(exporter)
        .build();

    Ok(provider)
}

/// OTEL_EXPORTER_OTLP_PROTOCOL selects the exporter; only `grpc` picks tonic,
/// `http/protobuf` (the OTel default) and anything unrecognised use HTTP
fn uses_grpc(protocol: Option<&str>) -> bool {
    matches!(protocol.map(str::trim), Some(p) if p.eq_ignore_ascii_case("grpc"))
}
