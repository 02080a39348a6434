#![warn(clippy::pedantic)]

mod error;
mod extract;
mod openapi;
mod route;
mod trace;
mod validation;

use std::{net::IpAddr, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{Extension, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// Handlers reach the database pool through `State<Database>`, so it is
/// injected here instead of living in a global.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
}

/// Builds the application router with its documentation and middleware.
pub fn app(state: State) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest_api_service("/docs", route::docs::routes())
		.merge(route::article::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(trace::layer())
		.layer(PropagateRequestIdLayer::x_request_id())
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.layer(CorsLayer::permissive())
		.layer(CompressionLayer::new())
		.with_state(state)
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
	std::env::var(name).map_or(default, |value| {
		value
			.parse()
			.unwrap_or_else(|_| panic!("{name} must be a valid value, got {value:?}"))
	})
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let _guard = trace::init_tracing_subscriber(
		std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_some(),
	);

	let database = PgPoolOptions::new()
		.max_connections(env_or("DATABASE_MAX_CONNECTIONS", 10))
		.connect(&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"))
		.await
		.expect("failed to connect to database");

	tracing::info!("database connected");

	let host = env_or("HOST", IpAddr::from([0, 0, 0, 0]));
	let port = env_or("PORT", 8080_u16);

	let listener = tokio::net::TcpListener::bind((host, port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on {}:{}", host, port);

	axum::serve(listener, app(State { database }))
		.await
		.expect("server error");
}
