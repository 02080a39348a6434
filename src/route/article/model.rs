pub use crate::route::model::{IdInput, Message, Paginate};

use std::str::FromStr;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::validation::{one_of, required};

/// The publication state of an article.
///
/// [`Status::Trash`] marks an article as deleted. Trashed articles stay in
/// storage but are never listed or returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	Publish,
	Draft,
	Trash,
}

impl Status {
	pub const ALL: [Self; 3] = [Self::Publish, Self::Draft, Self::Trash];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Publish => "publish",
			Self::Draft => "draft",
			Self::Trash => "trash",
		}
	}
}

#[derive(Debug, thiserror::Error)]
#[error("unknown status {0:?}")]
pub struct UnknownStatus(String);

impl FromStr for Status {
	type Err = UnknownStatus;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|status| status.as_str() == value)
			.ok_or_else(|| UnknownStatus(value.to_owned()))
	}
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
	required(status)?;

	match status.parse::<Status>() {
		Ok(..) => Ok(()),
		Err(..) => Err(one_of(&Status::ALL.map(Status::as_str))),
	}
}

/// A single article.
///
/// Missing input fields default to an empty string, so they are reported
/// as empty rather than as malformed JSON.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Article {
	/// The unique identifier of the article.
	#[serde(skip_deserializing)]
	pub id: i64,
	/// The headline of the article.
	#[serde(default)]
	#[validate(custom(function = "required"), length(min = 20))]
	pub title: String,
	/// The body of the article.
	#[serde(default)]
	#[validate(custom(function = "required"), length(min = 200))]
	pub content: String,
	/// The category the article is filed under.
	#[serde(default)]
	#[validate(custom(function = "required"), length(min = 3))]
	pub category: String,
	/// One of `publish`, `draft` or `trash`.
	#[serde(default)]
	#[validate(custom(function = "validate_status"))]
	pub status: String,
	/// The creation time of the article.
	#[serde(skip_deserializing)]
	pub created_date: chrono::DateTime<chrono::Utc>,
	/// The last update time of the article.
	#[serde(skip_deserializing)]
	pub updated_date: chrono::DateTime<chrono::Utc>,
}
