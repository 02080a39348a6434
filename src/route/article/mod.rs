use aide::axum::{
	routing::{get, get_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur while handling an article route.
///
/// Storage errors keep the underlying [`sqlx::Error`] for logging, but the
/// client only sees a generic message for the operation that failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown article {0}")]
	UnknownArticle(i64),
	#[error("failed to create article: {0}")]
	Create(#[source] sqlx::Error),
	#[error("failed to fetch articles: {0}")]
	List(#[source] sqlx::Error),
	#[error("failed to decode article row: {0}")]
	Decode(#[source] sqlx::Error),
	#[error("failed to fetch article {0}: {1}")]
	Get(i64, #[source] sqlx::Error),
	#[error("failed to update article {0}: {1}")]
	Update(i64, #[source] sqlx::Error),
	#[error("failed to delete article {0}: {1}")]
	Delete(i64, #[source] sqlx::Error),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/article/",
			get_with(list_articles, list_articles_docs)
				.post_with(create_article, create_article_docs),
		)
		.route("/article", get(list_articles).post(create_article))
		.api_route(
			"/article/:id",
			get_with(get_article, get_article_docs)
				.put_with(update_article, update_article_docs)
				.delete_with(delete_article, delete_article_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownArticle(..) => StatusCode::NOT_FOUND,
			Self::Create(..)
			| Self::List(..)
			| Self::Decode(..)
			| Self::Get(..)
			| Self::Update(..)
			| Self::Delete(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<String> {
		let message = match self {
			Self::UnknownArticle(..) => "article not found",
			Self::Create(..) => "failed to create article",
			Self::List(..) => "failed to fetch articles",
			Self::Decode(..) => "failed to read article data",
			Self::Get(..) => "failed to fetch article",
			Self::Update(..) => "failed to update article",
			Self::Delete(..) => "failed to delete article",
		};

		vec![message.into()]
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	fn article(title: &str) -> serde_json::Value {
		json!({
			"title": title,
			"content": "Lorem ipsum dolor sit amet. ".repeat(10),
			"category": "technology",
			"status": "publish",
		})
	}

	#[tokio::test]
	async fn test_create_rejects_short_fields() {
		let app = offline_app();

		let response = app
			.post("/article/")
			.json(&json!({
				"title": "Short",
				"content": "Too short",
				"category": "ab",
				"status": "archived",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!([
				"title must be at least 20 characters",
				"content must be at least 200 characters",
				"category must be at least 3 characters",
				"status must be one of: publish draft trash",
			])
		);
	}

	#[tokio::test]
	async fn test_create_rejects_each_field_independently() {
		let app = offline_app();

		for (field, value, message) in [
			("title", "x".repeat(19), "title must be at least 20 characters"),
			("content", "x".repeat(199), "content must be at least 200 characters"),
			("category", "xy".into(), "category must be at least 3 characters"),
			("status", "deleted".into(), "status must be one of: publish draft trash"),
		] {
			let mut body = article("A headline that is long enough");
			body[field] = json!(value);

			let response = app.post("/article/").json(&body).await;

			assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
			assert_eq!(response.json::<Value>()["errors"], json!([message]));
		}
	}

	#[tokio::test]
	async fn test_create_rejects_malformed_json() {
		let app = offline_app();

		let response = app.post("/article/").text("{\"title\": ").await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!(["invalid JSON format"])
		);

		let response = app
			.post("/article/")
			.json(&json!({ "title": 42 }))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!(["invalid JSON format"])
		);
	}

	#[tokio::test]
	async fn test_update_rejects_missing_fields() {
		let app = offline_app();

		let response = app.put("/article/1").json(&json!({})).await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!([
				"title must not be empty",
				"content must not be empty",
				"category must not be empty",
				"status must not be empty",
			])
		);
	}

	#[tokio::test]
	async fn test_list_rejects_malformed_pagination() {
		let app = offline_app();

		let response = app.get("/article/").add_query_param("limit", "ten").await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!(["invalid limit parameter"])
		);

		let response = app.get("/article/").add_query_param("offset", "-5").await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!(["invalid offset parameter"])
		);
	}

	#[tokio::test]
	async fn test_malformed_id() {
		let app = offline_app();

		let response = app.get("/article/abc").await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!(["invalid id parameter"])
		);
	}

	#[tokio::test]
	async fn test_storage_failure_is_not_leaked() {
		let app = offline_app();

		let response = app
			.post("/article/")
			.json(&article("A headline that is long enough"))
			.await;

		assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!(["failed to create article"])
		);

		// a limit beyond u32 still passes validation and reaches storage
		let response = app
			.get("/article/")
			.add_query_param("limit", "5000000000")
			.await;

		assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!(["failed to fetch articles"])
		);

		let response = app
			.put("/article/1")
			.json(&article("A headline that is long enough"))
			.await;

		assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!(["failed to update article"])
		);

		let response = app.get("/article/1").await;

		assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!(["failed to fetch article"])
		);

		let response = app.delete("/article/1").await;

		assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!(["failed to delete article"])
		);
	}

	#[test]
	fn test_decode_failure_is_generic() {
		use crate::error::ErrorShape;

		let error = super::Error::Decode(sqlx::Error::ColumnNotFound("status".into()));

		assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(error.errors(), vec!["failed to read article data"]);
		assert!(error.to_string().contains("status"));
	}

	#[sqlx::test]
	#[ignore = "requires DATABASE_URL"]
	async fn test_article_lifecycle(pool: Database) {
		let app = app(pool);

		let body = article("A headline that is long enough");
		let response = app.post("/article/").json(&body).await;

		assert_eq!(response.status_code(), StatusCode::CREATED);

		let created = response.json::<Value>();
		let id = created["id"].as_i64().unwrap();

		assert!(id > 0);

		for field in ["title", "content", "category", "status"] {
			assert_eq!(created[field], body[field]);
		}

		let response = app.get(&format!("/article/{id}")).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>(), created);

		let response = app.delete(&format!("/article/{id}")).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(
			response.json::<Value>()["message"],
			format!("article {id} deleted successfully")
		);

		let response = app.get(&format!("/article/{id}")).await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(
			response.json::<Value>()["errors"],
			json!(["article not found"])
		);

		// deleting again is a no-op
		let response = app.delete(&format!("/article/{id}")).await;

		assert_eq!(response.status_code(), StatusCode::OK);
	}

	#[sqlx::test]
	#[ignore = "requires DATABASE_URL"]
	async fn test_identifiers_are_distinct(pool: Database) {
		let app = app(pool);

		let mut ids = Vec::new();

		for _ in 0..3 {
			let response = app
				.post("/article")
				.json(&article("A headline that is long enough"))
				.await;

			assert_eq!(response.status_code(), StatusCode::CREATED);
			ids.push(response.json::<Value>()["id"].as_i64().unwrap());
		}

		ids.sort_unstable();
		ids.dedup();

		assert_eq!(ids.len(), 3);
		assert!(ids.iter().all(|id| *id > 0));
	}

	#[sqlx::test]
	#[ignore = "requires DATABASE_URL"]
	async fn test_list_skips_trashed_articles(pool: Database) {
		let app = app(pool);

		let mut ids = Vec::new();

		for n in 0..5 {
			let response = app
				.post("/article/")
				.json(&article(&format!("A headline that is long enough #{n}")))
				.await;

			ids.push(response.json::<Value>()["id"].as_i64().unwrap());
		}

		app.delete(&format!("/article/{}", ids[2])).await;

		let response = app.get("/article/").await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let listed = response
			.json::<Vec<Value>>()
			.iter()
			.map(|article| article["id"].as_i64().unwrap())
			.collect::<Vec<_>>();

		assert_eq!(listed, vec![ids[0], ids[1], ids[3], ids[4]]);

		for offset in 0..4 {
			let response = app
				.get("/article/")
				.add_query_param("limit", 1)
				.add_query_param("offset", offset)
				.await;

			let page = response.json::<Vec<Value>>();

			assert_eq!(page.len(), 1);
			assert_ne!(page[0]["id"].as_i64(), Some(ids[2]));
		}

		let response = app.get("/article/").add_query_param("limit", 0).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>(), json!([]));
	}

	#[sqlx::test]
	#[ignore = "requires DATABASE_URL"]
	async fn test_update_replaces_fields(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/article/")
			.json(&article("A headline that is long enough"))
			.await;
		let created = response.json::<Value>();
		let id = created["id"].as_i64().unwrap();

		let mut body = article("An entirely different headline");
		body["status"] = json!("draft");

		let response = app.put(&format!("/article/{id}")).json(&body).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(
			response.json::<Value>()["message"],
			format!("article {id} updated successfully")
		);

		let updated = app.get(&format!("/article/{id}")).await.json::<Value>();

		assert_eq!(updated["title"], body["title"]);
		assert_eq!(updated["status"], "draft");
		// timestamps are only set on create
		assert_eq!(updated["updated_date"], created["updated_date"]);
	}

	#[sqlx::test]
	#[ignore = "requires DATABASE_URL"]
	async fn test_update_unknown_article_succeeds(pool: Database) {
		let app = app(pool);

		let response = app
			.put("/article/9999")
			.json(&article("A headline that is long enough"))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(
			response.json::<Value>()["message"],
			"article 9999 updated successfully"
		);

		let response = app.get("/article/9999").await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}
}
