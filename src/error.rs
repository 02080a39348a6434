use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The body of every error response.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
	pub errors: Vec<String>,
}

/// Describes how a route-specific error is presented to the client.
///
/// The [`std::fmt::Display`] output is only logged, so it can contain
/// sensitive information. What the client sees comes from [`ErrorShape::errors`].
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn errors(&self) -> Vec<String>;
}

/// Errors raised before a handler runs, while extracting its input.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {}", .0.join(", "))]
	Validation(Vec<String>),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		StatusCode::BAD_REQUEST
	}

	pub fn errors(&self) -> Vec<String> {
		match self {
			Self::Validation(errors) => errors.clone(),
			Self::Json(..) => vec!["invalid JSON format".into()],
			Self::Query(..) => vec!["invalid query parameters".into()],
			Self::Path(..) => vec!["invalid id parameter".into()],
		}
	}
}

/// The error type returned from handlers.
///
/// `T` is the error enum of the route module, and [`AppError`]s raised
/// while extracting input can be propagated alongside it with `?`.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<T> {
	#[error(transparent)]
	App(#[from] AppError),
	#[error(transparent)]
	Route(T),
}

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

impl<T> aide::OperationOutput for RouteError<T> {
	type Inner = ErrorResponse;
}

/// Builds the JSON error response, logging server errors with their full
/// (private) description.
fn respond(
	status: StatusCode,
	errors: Vec<String>,
	source: &dyn std::error::Error,
) -> Response<Body> {
	if status.is_server_error() {
		tracing::error!(error = %source, "request failed");
	} else {
		tracing::debug!(error = %source, status = status.as_u16(), "rejected request");
	}

	(status, Json(ErrorResponse { errors })).into_response()
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		respond(self.status(), self.errors(), &self)
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => respond(error.status(), error.errors(), &error),
		}
	}
}
