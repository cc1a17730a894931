use aide::axum::{routing::post_with, ApiRouter};

use crate::AppState;

pub mod model;
pub mod route;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/", post_with(create_message, create_message_docs))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_anonymous_message_has_no_user(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/contact")
			.json(&json!({
				"name": "Jane",
				"email": "jane@example.com",
				"message": "Do you take recipe suggestions?",
			}))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["user_id"], json!(null));
	}

	#[sqlx::test]
	async fn test_authenticated_message_is_attributed(pool: Database) {
		let app = app(pool);
		register(&app, "alice").await;

		let response = app
			.post("/contact")
			.json(&json!({
				"name": "Alice",
				"email": "alice@example.com",
				"message": "Love the site!",
			}))
			.await;

		assert_eq!(response.status_code(), 200);
		assert!(response.json::<serde_json::Value>()["user_id"].is_i64());
	}
}
