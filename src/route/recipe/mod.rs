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
	#[error("unknown recipe {0}")]
	UnknownRecipe(i32),
	#[error("unknown review {0}")]
	UnknownReview(i32),
	#[error("user already reviewed this recipe")]
	AlreadyReviewed,
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", get_with(get_recipes, get_recipes_docs))
		.api_route("/:id", get_with(get_recipe, get_recipe_docs))
		.api_route(
			"/:id/favorite",
			post_with(toggle_favorite, toggle_favorite_docs),
		)
		.api_route(
			"/:id/reviews",
			get_with(get_reviews, get_reviews_docs).post_with(create_review, create_review_docs),
		)
		.api_route(
			"/reviews/:id",
			put_with(update_review, update_review_docs)
				.delete_with(delete_review, delete_review_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownRecipe(..) | Self::UnknownReview(..) => StatusCode::NOT_FOUND,
			Self::AlreadyReviewed => StatusCode::CONFLICT,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownRecipe(recipe) => vec![error::Message {
				content: "unknown_recipe".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("recipe".into(), json!(recipe));
					map
				})),
			}],
			Self::UnknownReview(review) => vec![error::Message {
				content: "unknown_review".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("review".into(), json!(review));
					map
				})),
			}],
			Self::AlreadyReviewed => vec![error::Message {
				content: "already_reviewed".into(),
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
	async fn test_toggle_flips_only_the_targeted_recipe(pool: Database) {
		let first = seed_recipe(&pool, "Banana mash").await;
		let second = seed_recipe(&pool, "Carrot puree").await;

		let app = app(pool);
		register(&app, "alice").await;

		let response = app.post(&format!("/recipes/{first}/favorite")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["favorited"], true);

		let other = app.get(&format!("/recipes/{second}")).await;
		assert_eq!(other.json::<serde_json::Value>()["favorited"], false);

		// Toggling again restores the original state.
		let response = app.post(&format!("/recipes/{first}/favorite")).await;
		assert_eq!(response.json::<serde_json::Value>()["favorited"], false);
	}

	#[sqlx::test]
	async fn test_anonymous_toggle_is_rejected_without_a_write(pool: Database) {
		let recipe = seed_recipe(&pool, "Banana mash").await;

		let app = app(pool);

		let response = app.post(&format!("/recipes/{recipe}/favorite")).await;

		assert_eq!(response.status_code(), 401);

		let recipe = app.get(&format!("/recipes/{recipe}")).await;
		assert_eq!(recipe.json::<serde_json::Value>()["favorited"], false);
	}

	#[sqlx::test]
	async fn test_second_review_by_same_user_conflicts(pool: Database) {
		let recipe = seed_recipe(&pool, "Banana mash").await;

		let app = app(pool);
		register(&app, "alice").await;

		let response = app
			.post(&format!("/recipes/{recipe}/reviews"))
			.json(&json!({ "rating": 8, "body": "Loved it" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app
			.post(&format!("/recipes/{recipe}/reviews"))
			.json(&json!({ "rating": 3, "body": "Changed my mind" }))
			.await;

		assert_eq!(response.status_code(), 409);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["content"],
			"already_reviewed"
		);
	}

	#[sqlx::test]
	async fn test_out_of_range_rating_never_reaches_the_store(pool: Database) {
		let recipe = seed_recipe(&pool, "Banana mash").await;

		let app = app(pool);
		register(&app, "alice").await;

		let response = app
			.post(&format!("/recipes/{recipe}/reviews"))
			.json(&json!({ "rating": 11, "body": "Too good" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let reviews = app.get(&format!("/recipes/{recipe}/reviews")).await;
		assert_eq!(
			reviews.json::<serde_json::Value>()["reviews"]
				.as_array()
				.unwrap()
				.len(),
			0
		);
	}

	#[sqlx::test]
	async fn test_review_ids_share_one_counter_across_recipes(pool: Database) {
		// Post ids are assigned from a single table-wide counter, not scoped
		// per parent recipe.
		let first = seed_recipe(&pool, "Banana mash").await;
		let second = seed_recipe(&pool, "Carrot puree").await;

		let app = app(pool);

		register(&app, "alice").await;
		let a = app
			.post(&format!("/recipes/{first}/reviews"))
			.json(&json!({ "rating": 8, "body": "Nice" }))
			.await
			.json::<serde_json::Value>()["id"]
			.as_i64()
			.unwrap();

		register(&app, "bob").await;
		let b = app
			.post(&format!("/recipes/{second}/reviews"))
			.json(&json!({ "rating": 5, "body": "Fine" }))
			.await
			.json::<serde_json::Value>()["id"]
			.as_i64()
			.unwrap();

		assert!(b > a);
	}

	#[sqlx::test]
	async fn test_editing_someone_elses_review_is_unreachable(pool: Database) {
		let recipe = seed_recipe(&pool, "Banana mash").await;

		let app = app(pool);

		register(&app, "alice").await;
		let review = app
			.post(&format!("/recipes/{recipe}/reviews"))
			.json(&json!({ "rating": 8, "body": "Nice" }))
			.await
			.json::<serde_json::Value>()["id"]
			.as_i64()
			.unwrap();

		register(&app, "bob").await;
		let response = app
			.put(&format!("/recipes/reviews/{review}"))
			.json(&json!({ "rating": 1 }))
			.await;

		assert_eq!(response.status_code(), 404);
	}
}
