use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{number, Fields};

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_OFFSET: i64 = 0;

/// A pagination window.
///
/// Both values are kept as strings so that a malformed value can be
/// reported against the parameter it came from.
#[derive(Debug, Default, Deserialize, Validate, JsonSchema)]
pub struct Paginate {
	/// The maximum number of items to return.
	#[validate(custom(function = "number"))]
	#[schemars(with = "Option<u64>")]
	pub limit: Option<String>,
	/// The number of items to skip.
	#[validate(custom(function = "number"))]
	#[schemars(with = "Option<u64>")]
	pub offset: Option<String>,
}

impl Fields for Paginate {
	const FIELDS: &'static [&'static str] = &["limit", "offset"];
}

fn count(value: Option<&str>, default: i64) -> i64 {
	value
		.and_then(|value| value.parse::<i64>().ok())
		.filter(|value| *value >= 0)
		.unwrap_or(default)
}

impl Paginate {
	pub fn limit(&self) -> i64 {
		count(self.limit.as_deref(), DEFAULT_LIMIT)
	}

	pub fn offset(&self) -> i64 {
		count(self.offset.as_deref(), DEFAULT_OFFSET)
	}
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: i64,
}

impl Fields for IdInput {
	const FIELDS: &'static [&'static str] = &["id"];
}

/// A confirmation returned by operations that do not return the resource.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Message {
	pub message: String,
}

impl Message {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}
