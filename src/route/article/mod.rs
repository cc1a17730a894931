use std::borrow::Cow;

use aide::axum::{
	routing::{get_with, post_with, put_with},
	ApiRouter,
};
use axum::http::StatusCode;
use serde_json::json;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown article {0}")]
	UnknownArticle(i32),
	#[error("unknown comment {0}")]
	UnknownComment(i32),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", get_with(get_articles, get_articles_docs))
		.api_route("/:id", get_with(get_article, get_article_docs))
		.api_route("/:id/like", post_with(toggle_like, toggle_like_docs))
		.api_route(
			"/:id/comments",
			get_with(get_comments, get_comments_docs).post_with(create_comment, create_comment_docs),
		)
		.api_route(
			"/comments/:id",
			put_with(update_comment, update_comment_docs)
				.delete_with(delete_comment, delete_comment_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownArticle(..) | Self::UnknownComment(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownArticle(article) => vec![error::Message {
				content: "unknown_article".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("article".into(), json!(article));
					map
				})),
			}],
			Self::UnknownComment(comment) => vec![error::Message {
				content: "unknown_comment".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("comment".into(), json!(comment));
					map
				})),
			}],
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_repeat_comments_by_one_user_are_accepted(pool: Database) {
		// Unlike reviews, comments carry no one-per-user restriction.
		let article = seed_article(&pool, "Sleep schedules").await;

		let app = app(pool);
		register(&app, "alice").await;

		for body in ["First thought", "Second thought"] {
			let response = app
				.post(&format!("/articles/{article}/comments"))
				.json(&json!({ "body": body }))
				.await;

			assert_eq!(response.status_code(), 200);
		}

		let comments = app.get(&format!("/articles/{article}/comments")).await;
		let comments = comments.json::<serde_json::Value>();

		assert_eq!(comments["comments"].as_array().unwrap().len(), 2);
	}

	#[sqlx::test]
	async fn test_deleted_comment_disappears_from_subsequent_lists(pool: Database) {
		let article = seed_article(&pool, "Sleep schedules").await;

		let app = app(pool);
		register(&app, "alice").await;

		let comment = app
			.post(&format!("/articles/{article}/comments"))
			.json(&json!({ "body": "Remove me" }))
			.await
			.json::<serde_json::Value>()["id"]
			.as_i64()
			.unwrap();

		let response = app.delete(&format!("/articles/comments/{comment}")).await;
		assert_eq!(response.status_code(), 200);

		let comments = app.get(&format!("/articles/{article}/comments")).await;
		assert_eq!(
			comments.json::<serde_json::Value>()["comments"]
				.as_array()
				.unwrap()
				.len(),
			0
		);
	}

	#[sqlx::test]
	async fn test_comment_authors_are_resolved_in_one_map(pool: Database) {
		let article = seed_article(&pool, "Sleep schedules").await;

		let app = app(pool);

		register(&app, "alice").await;
		app.post(&format!("/articles/{article}/comments"))
			.json(&json!({ "body": "Hello" }))
			.await;

		register(&app, "bob").await;
		app.post(&format!("/articles/{article}/comments"))
			.json(&json!({ "body": "Hi" }))
			.await;

		let comments = app.get(&format!("/articles/{article}/comments")).await;
		let comments = comments.json::<serde_json::Value>();

		let authors = comments["authors"].as_object().unwrap();
		let names = authors.values().collect::<Vec<_>>();

		assert_eq!(authors.len(), 2);
		assert!(names.contains(&&json!("alice")));
		assert!(names.contains(&&json!("bob")));
	}
}
