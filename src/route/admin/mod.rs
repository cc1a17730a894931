use std::borrow::Cow;

use aide::axum::{
	routing::{delete_with, get_with, put_with},
	ApiRouter,
};
use axum::http::StatusCode;
use serde_json::json;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur in the admin tables.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown {0} record {1}")]
	UnknownRecord(&'static str, i32),
	#[error("duplicate value for {0}")]
	Duplicate(&'static str),
	#[error("password hashing error: {0}")]
	Argon(argon2::password_hash::Error),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/users",
			get_with(list_users, list_users_docs).post_with(create_user, create_user_docs),
		)
		.api_route(
			"/users/:id",
			put_with(update_user, update_user_docs).delete_with(delete_user, delete_user_docs),
		)
		.api_route(
			"/recipes",
			get_with(list_recipes, list_recipes_docs).post_with(create_recipe, create_recipe_docs),
		)
		.api_route(
			"/recipes/:id",
			put_with(update_recipe, update_recipe_docs)
				.delete_with(delete_recipe, delete_recipe_docs),
		)
		.api_route(
			"/articles",
			get_with(list_articles, list_articles_docs)
				.post_with(create_article, create_article_docs),
		)
		.api_route(
			"/articles/:id",
			put_with(update_article, update_article_docs)
				.delete_with(delete_article, delete_article_docs),
		)
		.api_route(
			"/toddlers",
			get_with(list_toddlers, list_toddlers_docs)
				.post_with(create_toddler, create_toddler_docs),
		)
		.api_route(
			"/toddlers/:id",
			put_with(update_toddler, update_toddler_docs)
				.delete_with(delete_toddler, delete_toddler_docs),
		)
		.api_route("/reviews", get_with(list_reviews, list_reviews_docs))
		.api_route(
			"/reviews/:id",
			delete_with(delete_review, delete_review_docs),
		)
		.api_route("/comments", get_with(list_comments, list_comments_docs))
		.api_route(
			"/comments/:id",
			delete_with(delete_comment, delete_comment_docs),
		)
		.api_route("/messages", get_with(list_messages, list_messages_docs))
		.api_route(
			"/messages/:id",
			delete_with(delete_message, delete_message_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownRecord(..) => StatusCode::NOT_FOUND,
			Self::Duplicate(..) => StatusCode::CONFLICT,
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownRecord(table, id) => vec![error::Message {
				content: "unknown_record".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("table".into(), json!(table));
					map.insert("id".into(), json!(id));
					map
				})),
			}],
			Self::Duplicate(field) => vec![error::Message {
				content: "already_taken".into(),
				field: Some((*field).into()),
				details: None,
			}],
			Self::Argon(..) => vec![error::Message {
				content: "internal_server_error".into(),
				field: None,
				details: None,
			}],
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_admin_tables_require_administrator(pool: Database) {
		let app = app(pool);

		let response = app.get("/admin/users").await;
		assert_eq!(response.status_code(), 401);

		register(&app, "regular").await;

		let response = app.get("/admin/users").await;
		assert_eq!(response.status_code(), 403);
	}

	/// The row version advances on any rewrite of the row, even one that
	/// stores identical values, so it distinguishes a skipped write from a
	/// no-op write.
	async fn row_version(pool: &Database, recipe: i32) -> i64 {
		sqlx::query_scalar::<_, i64>("SELECT xmin::text::bigint FROM recipes WHERE id = $1")
			.bind(recipe)
			.fetch_one(pool)
			.await
			.unwrap()
	}

	#[sqlx::test]
	async fn test_unchanged_edit_issues_no_write(pool: Database) {
		let app = app(pool.clone());

		register(&app, "boss").await;
		promote(&pool, "boss").await;

		let recipe = seed_recipe(&pool, "Banana mash").await;
		let before = row_version(&pool, recipe).await;

		let response = app
			.put(&format!("/admin/recipes/{recipe}"))
			.json(&json!({ "title": "Banana mash" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["changed"], false);
		assert_eq!(row_version(&pool, recipe).await, before);

		let response = app
			.put(&format!("/admin/recipes/{recipe}"))
			.json(&json!({ "title": "Banana purée" }))
			.await;

		assert_eq!(response.json::<serde_json::Value>()["changed"], true);
		assert_eq!(
			response.json::<serde_json::Value>()["record"]["title"],
			"Banana purée"
		);
		assert_ne!(row_version(&pool, recipe).await, before);
	}

	#[sqlx::test]
	async fn test_admin_lists_return_every_row(pool: Database) {
		let app = app(pool.clone());

		register(&app, "boss").await;
		promote(&pool, "boss").await;

		for n in 0..12 {
			seed_recipe(&pool, &format!("Recipe {n}")).await;
		}

		let listed = app.get("/admin/recipes").await;
		let listed = listed.json::<serde_json::Value>();
		let rows = listed.as_array().unwrap();

		assert_eq!(rows.len(), 12);

		// Ordered by id ascending.
		let ids = rows
			.iter()
			.map(|row| row["id"].as_i64().unwrap())
			.collect::<Vec<_>>();
		let mut sorted = ids.clone();
		sorted.sort_unstable();

		assert_eq!(ids, sorted);
	}

	#[sqlx::test]
	async fn test_admin_duplicate_username_is_field_specific(pool: Database) {
		let app = app(pool.clone());

		register(&app, "taken").await;
		register(&app, "boss").await;
		promote(&pool, "boss").await;

		let response = app
			.post("/admin/users")
			.json(&json!({
				"firstname": "Another",
				"lastname": "Person",
				"username": "taken",
				"password": "Hunter2hunter!",
				"email": "another@person.com",
				"contactno": "5550002222",
				"sex": "female",
			}))
			.await;

		assert_eq!(response.status_code(), 409);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["field"],
			"username"
		);
	}

	#[sqlx::test]
	async fn test_admin_review_table_lists_and_deletes(pool: Database) {
		let app = app(pool.clone());

		register(&app, "reviewer").await;
		let recipe = seed_recipe(&pool, "Oat porridge").await;

		let review = app
			.post(&format!("/recipes/{recipe}/reviews"))
			.json(&json!({ "rating": 8, "body": "Lovely" }))
			.await;
		let review = review.json::<serde_json::Value>()["id"].as_i64().unwrap();

		register(&app, "boss").await;
		promote(&pool, "boss").await;

		let listed = app.get("/admin/reviews").await;
		let listed = listed.json::<serde_json::Value>();
		let rows = listed.as_array().unwrap();

		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0]["recipe_title"], "Oat porridge");
		assert_eq!(rows[0]["username"], "reviewer");

		let response = app.delete(&format!("/admin/reviews/{review}")).await;
		assert_eq!(response.status_code(), 200);

		let listed = app.get("/admin/reviews").await;
		assert_eq!(listed.json::<serde_json::Value>().as_array().unwrap().len(), 0);
	}
}
