use std::time::Duration;

use axum::{
	body::Body,
	http::{Request, Response},
};
use opentelemetry::{global, KeyValue};
use opentelemetry_sdk::{
	metrics::{
		reader::{DefaultAggregationSelector, DefaultTemporalitySelector},
		Aggregation, Instrument, MeterProviderBuilder, PeriodicReader, SdkMeterProvider, Stream,
	},
	runtime,
	trace::{BatchConfig, Sampler, Tracer},
	Resource,
};
use opentelemetry_semantic_conventions::{
	resource::{DEPLOYMENT_ENVIRONMENT, SERVICE_NAME, SERVICE_VERSION},
	SCHEMA_URL,
};
use tower_http::{
	classify::{ServerErrorsAsFailures, SharedClassifier},
	trace::TraceLayer,
};
use tracing::{level_filters::LevelFilter, Level, Span};
use tracing_opentelemetry::MetricsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the histogram recorded for every response.
const LATENCY_METRIC: &str = "latency_ms";

/// Constructs a [`Resource`] which describes the service.
fn resource() -> Resource {
	Resource::from_schema_url(
		[
			KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
			KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
			KeyValue::new(
				DEPLOYMENT_ENVIRONMENT,
				if cfg!(debug_assertions) {
					"development"
				} else {
					"production"
				},
			),
		],
		SCHEMA_URL,
	)
}

/// Constructs an [`SdkMeterProvider`] exporting over OTLP, with a view for
/// the response latency histogram.
fn init_meter_provider() -> SdkMeterProvider {
	let exporter = opentelemetry_otlp::new_exporter()
		.tonic()
		.build_metrics_exporter(
			Box::new(DefaultAggregationSelector::new()),
			Box::new(DefaultTemporalitySelector::new()),
		)
		.expect("failed to build the OTLP metrics exporter");

	let reader = PeriodicReader::builder(exporter, runtime::Tokio)
		.with_interval(Duration::from_secs(5))
		.build();

	// Also print metrics in development
	#[cfg(debug_assertions)]
	let stdout_reader = PeriodicReader::builder(
		opentelemetry_stdout::MetricsExporter::default(),
		runtime::Tokio,
	)
	.build();

	let view_latency = |instrument: &Instrument| -> Option<Stream> {
		(instrument.name == LATENCY_METRIC).then(|| {
			Stream::new()
				.name(LATENCY_METRIC)
				.aggregation(Aggregation::Default)
		})
	};

	let meter_provider = MeterProviderBuilder::default();
	#[cfg(debug_assertions)]
	let meter_provider = meter_provider.with_reader(stdout_reader);

	let meter_provider = meter_provider
		.with_resource(resource())
		.with_reader(reader)
		.with_view(view_latency)
		.build();

	global::set_meter_provider(meter_provider.clone());

	meter_provider
}

/// Constructs a [`Tracer`] which exports every span over OTLP.
fn init_tracer() -> Tracer {
	opentelemetry_otlp::new_pipeline()
		.tracing()
		.with_trace_config(
			opentelemetry_sdk::trace::Config::default()
				.with_sampler(Sampler::AlwaysOn)
				.with_resource(resource()),
		)
		.with_batch_config(BatchConfig::default())
		.with_exporter(opentelemetry_otlp::new_exporter().tonic())
		.install_batch(runtime::Tokio)
		.expect("failed to install the OTLP trace pipeline")
}

/// Initializes the tracing subscriber, logging to the console at INFO.
///
/// When `export` is set, spans and metrics are also exported over OTLP
/// (configured through the standard `OTEL_EXPORTER_OTLP_*` variables), and the
/// returned guard flushes them when dropped.
pub fn init_tracing_subscriber(export: bool) -> Option<OtelGuard> {
	let meter_provider = export.then(init_meter_provider);
	let tracer = export.then(init_tracer);

	tracing_subscriber::registry()
		.with(LevelFilter::from_level(Level::INFO))
		.with(tracing_subscriber::fmt::layer().with_ansi(true))
		.with(meter_provider.clone().map(MetricsLayer::new))
		.with(tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)))
		.init();

	meter_provider.map(|meter_provider| OtelGuard { meter_provider })
}

pub struct OtelGuard {
	meter_provider: SdkMeterProvider,
}

impl Drop for OtelGuard {
	fn drop(&mut self) {
		if let Err(err) = self.meter_provider.shutdown() {
			eprintln!("{err:?}");
		}

		global::shutdown_tracer_provider();
	}
}

/// A [`TraceLayer`] that opens a span per request, tagged with its request id,
/// and records the status and latency of every response.
pub fn layer() -> TraceLayer<
	SharedClassifier<ServerErrorsAsFailures>,
	impl Fn(&Request<Body>) -> Span + Clone,
	(),
	impl Fn(&Response<Body>, Duration, &Span) + Clone,
> {
	TraceLayer::new_for_http()
		.make_span_with(|request: &Request<Body>| {
			let request_id = request
				.headers()
				.get("x-request-id")
				.and_then(|value| value.to_str().ok())
				.unwrap_or_default();

			tracing::info_span!(
				"request",
				method = %request.method(),
				uri = %request.uri(),
				request_id
			)
		})
		.on_request(())
		.on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
			tracing::info!(
				histogram.latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
				status = response.status().as_u16(),
				"response"
			);
		})
}
