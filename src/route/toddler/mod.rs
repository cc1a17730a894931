use std::borrow::Cow;

use aide::axum::{
	routing::{get_with, put_with},
	ApiRouter,
};
use axum::http::StatusCode;
use serde_json::json;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown toddler {0}")]
	UnknownToddler(i32),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_toddlers, get_toddlers_docs).post_with(create_toddler, create_toddler_docs),
		)
		.api_route(
			"/:id",
			put_with(update_toddler, update_toddler_docs)
				.delete_with(delete_toddler, delete_toddler_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownToddler(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownToddler(toddler) => vec![error::Message {
				content: "unknown_toddler".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("toddler".into(), json!(toddler));
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
	async fn test_toddlers_are_scoped_to_their_owner(pool: Database) {
		let app = app(pool);

		register(&app, "alice").await;
		let toddler = app
			.post("/toddlers")
			.json(&json!({ "name": "Max", "age": 2, "gender": "male" }))
			.await;

		assert_eq!(toddler.status_code(), 200);
		let toddler = toddler.json::<serde_json::Value>()["id"].as_i64().unwrap();

		register(&app, "bob").await;

		let listed = app.get("/toddlers").await;
		assert_eq!(listed.json::<serde_json::Value>().as_array().unwrap().len(), 0);

		let response = app.delete(&format!("/toddlers/{toddler}")).await;
		assert_eq!(response.status_code(), 404);
	}
}
