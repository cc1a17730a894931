use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not
/// contain sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid email or password")]
	InvalidEmailOrPassword,
	#[error("password hashing error: {0}")]
	Argon(argon2::password_hash::Error),
	#[error("requires authentication")]
	NoSessionCookie,
	#[error("invalid session cookie")]
	InvalidSessionCookie,
	#[error("requires administrator role")]
	NotAnAdministrator,
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
	#[error("full name already taken")]
	FullNameTaken,
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/login", post_with(login, login_docs))
		.api_route("/logout", get_with(logout, logout_docs))
		.api_route("/register", post_with(register, register_docs))
		.api_route(
			"/me",
			get_with(get_me, get_me_docs)
				.put_with(update_me, update_me_docs)
				.delete_with(delete_me, delete_me_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidEmailOrPassword | Self::NoSessionCookie | Self::InvalidSessionCookie => {
				StatusCode::UNAUTHORIZED
			}
			Self::NotAnAdministrator => StatusCode::FORBIDDEN,
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::UsernameTaken | Self::EmailTaken | Self::FullNameTaken => StatusCode::CONFLICT,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		let field = match self {
			Self::UsernameTaken => Some("username"),
			Self::EmailTaken => Some("email"),
			Self::FullNameTaken => Some("firstname"),
			_ => None,
		};

		vec![error::Message {
			content: match self {
				Self::InvalidEmailOrPassword => "invalid_email_or_password".into(),
				Self::Argon(..) => "internal_server_error".into(),
				Self::NoSessionCookie => "requires_authentication".into(),
				Self::InvalidSessionCookie => "invalid_session".into(),
				Self::NotAnAdministrator => "requires_administrator".into(),
				Self::UsernameTaken | Self::EmailTaken | Self::FullNameTaken => {
					"already_taken".into()
				}
			},
			field: field.map(Into::into),
			details: None,
		}]
	}
}

/// Maps a duplicate-key database error on the `users` table to the
/// conflicting input field, used by both signup and the admin user table.
pub fn duplicate_user_field(error: &sqlx::Error) -> Option<&'static str> {
	let sqlx::Error::Database(ref database) = error else {
		return None;
	};

	match database.constraint() {
		Some("users_username_key") => Some("username"),
		Some("users_email_key") => Some("email"),
		Some("users_fullname_key") => Some("firstname"),
		_ => None,
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_signup_flow(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/auth/register")
			.json(&json!({
				"firstname": "John",
				"lastname": "Smith",
				"username": "john",
				"password": "Hunter2hunter!",
				"conpassword": "Hunter2hunter!",
				"email": "john@smith.com",
				"contactno": "5550001111",
				"sex": "male",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "Hunter2hunter!",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app.get("/auth/me").await;

		assert_eq!(response.status_code(), 200);

		assert_eq!(response.json::<serde_json::Value>()["username"], "john");
	}

	#[sqlx::test]
	async fn test_login_with_unknown_email_is_unauthorized(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "nobody@example.com",
				"password": "Hunter2hunter!",
			}))
			.await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["content"],
			"invalid_email_or_password"
		);
	}

	#[sqlx::test]
	async fn test_duplicate_username_is_field_specific(pool: Database) {
		let app = app(pool);

		let body = json!({
			"firstname": "John",
			"lastname": "Smith",
			"username": "john",
			"password": "Hunter2hunter!",
			"conpassword": "Hunter2hunter!",
			"email": "john@smith.com",
			"contactno": "5550001111",
			"sex": "male",
		});

		let response = app.post("/auth/register").json(&body).await;
		assert_eq!(response.status_code(), 200);

		let mut body = body;
		body["email"] = json!("john2@smith.com");
		body["lastname"] = json!("Smithers");

		let response = app.post("/auth/register").json(&body).await;

		assert_eq!(response.status_code(), 409);

		let errors = response.json::<serde_json::Value>();
		assert_eq!(errors["errors"][0]["field"], "username");
	}
}
