use aide::{openapi::Tag, transform::TransformOpenApi};

use crate::{error, extract::Json};

pub mod tag {
	pub const ARTICLE: &str = "Article";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Article API")
		.summary("Create, list, update and trash articles")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::ARTICLE.into(),
			description: Some("Article management".into()),
			..Default::default()
		})
		.default_response_with::<Json<error::ErrorResponse>, _>(|res| {
			res.example(error::ErrorResponse {
				errors: vec!["title must be at least 20 characters".into()],
			})
		})
}
