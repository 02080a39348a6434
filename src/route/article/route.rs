use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode};
use macros::route;

use crate::{
	extract::{Json, Path, Query},
	openapi::tag,
	Database,
};

use super::{model, Error, RouteError};

/// Create article
/// Creates a new article. Both timestamps are set to the current time.
#[route(
	tag = tag::ARTICLE,
	response(
		status = 201,
		description = "The created article.",
		shape = "Json<model::Article>"
	)
)]
pub async fn create_article(
	State(database): State<Database>,
	Json(input): Json<model::ArticleInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let now = chrono::Utc::now();

	let article = sqlx::query_as::<_, model::Article>(
		r#"
			INSERT INTO article (title, content, category, status, created_date, updated_date)
			VALUES ($1, $2, $3, $4, $5, $5)
			RETURNING *
		"#,
	)
	.bind(input.title)
	.bind(input.content)
	.bind(input.category)
	.bind(input.status)
	.bind(now)
	.fetch_one(&database)
	.await
	.map_err(Error::Create)?;

	Ok((StatusCode::CREATED, Json(article)))
}

/// List articles
/// Returns a page of articles that are not in the trash, ordered by id.
#[route(tag = tag::ARTICLE)]
pub async fn list_articles(
	State(database): State<Database>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Vec<model::Article>>, RouteError> {
	let articles = sqlx::query_as::<_, model::Article>(
		r#"
			SELECT * FROM article
			WHERE status <> $1
			ORDER BY id
			LIMIT $2 OFFSET $3
		"#,
	)
	.bind(model::Status::Trash.as_str())
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await
	.map_err(|error| match error {
		sqlx::Error::ColumnDecode { .. }
		| sqlx::Error::ColumnNotFound(..)
		| sqlx::Error::Decode(..) => Error::Decode(error),
		error => Error::List(error),
	})?;

	Ok(Json(articles))
}

/// Get article
/// Returns a single article by its id. Articles in the trash are not found.
#[route(tag = tag::ARTICLE)]
pub async fn get_article(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Article>, RouteError> {
	let article = sqlx::query_as::<_, model::Article>(
		r#"
			SELECT * FROM article
			WHERE id = $1 AND status <> $2
		"#,
	)
	.bind(path.id)
	.bind(model::Status::Trash.as_str())
	.fetch_optional(&database)
	.await
	.map_err(|error| Error::Get(path.id, error))?;

	Ok(Json(article.ok_or(Error::UnknownArticle(path.id))?))
}

/// Update article
/// Replaces the title, content, category and status of an article by its id.
/// The article is not checked for existence, and its timestamps are left as they are.
#[route(tag = tag::ARTICLE)]
pub async fn update_article(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::ArticleInput>,
) -> Result<Json<model::Message>, RouteError> {
	sqlx::query(
		r#"
			UPDATE article
			SET title = $1, content = $2, category = $3, status = $4
			WHERE id = $5
		"#,
	)
	.bind(input.title)
	.bind(input.content)
	.bind(input.category)
	.bind(input.status)
	.bind(path.id)
	.execute(&database)
	.await
	.map_err(|error| Error::Update(path.id, error))?;

	Ok(Json(model::Message::new(format!(
		"article {} updated successfully",
		path.id
	))))
}

/// Delete article
/// Moves an article to the trash by its id. Deleting an article that is already in the trash succeeds.
#[route(tag = tag::ARTICLE)]
pub async fn delete_article(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Message>, RouteError> {
	sqlx::query(
		r#"
			UPDATE article
			SET status = $1
			WHERE id = $2
		"#,
	)
	.bind(model::Status::Trash.as_str())
	.bind(path.id)
	.execute(&database)
	.await
	.map_err(|error| Error::Delete(path.id, error))?;

	Ok(Json(model::Message::new(format!(
		"article {} deleted successfully",
		path.id
	))))
}
