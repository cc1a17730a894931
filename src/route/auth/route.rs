use aide::axum::IntoApiResponse;
use argon2::{
	password_hash::{rand_core::OsRng, PasswordHash, SaltString},
	Argon2, PasswordHasher, PasswordVerifier,
};
use axum::{
	extract::State,
	http::{header, StatusCode},
};
use macros::route;

use crate::{
	extract::{Json, Session},
	openapi::tag,
	session, AppState, Database,
};

use super::{duplicate_user_field, model, Error, RouteError};

/// Hashes a password with argon2 and a freshly generated salt, producing a
/// PHC-format string.
pub fn hash_password(
	hasher: &Argon2,
	password: &str,
) -> Result<String, argon2::password_hash::Error> {
	let salt = SaltString::generate(&mut OsRng);

	Ok(hasher.hash_password(password.as_bytes(), &salt)?.to_string())
}

fn map_duplicate(error: sqlx::Error) -> RouteError {
	match duplicate_user_field(&error) {
		Some("username") => Error::UsernameTaken.into(),
		Some("email") => Error::EmailTaken.into(),
		Some(_) => Error::FullNameTaken.into(),
		None => RouteError::from(error),
	}
}

/// Log in
/// Logs in to an account, returning an associated session cookie.
#[route(tag = tag::AUTH, response(status = 200, description = "Logged in successfully.", shape = "Json<model::Session>"))]
pub async fn login(
	State(state): State<AppState>,
	Json(auth): Json<model::LoginInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	// A missing row is a credential problem; a failed query is not.
	let user = sqlx::query_as::<_, model::User>(r#"SELECT * FROM users WHERE email = $1"#)
		.bind(&auth.email)
		.fetch_optional(&state.database)
		.await?
		.ok_or(Error::InvalidEmailOrPassword)?;

	let hash = PasswordHash::new(&user.password).map_err(Error::Argon)?;

	if state
		.hasher
		.verify_password(auth.password.as_bytes(), &hash)
		.is_err()
	{
		return Err(Error::InvalidEmailOrPassword.into());
	}

	let session = sqlx::query_as::<_, model::Session>(
		"INSERT INTO sessions (user_id) VALUES ($1) RETURNING *",
	)
	.bind(user.id)
	.fetch_one(&state.database)
	.await?;

	let cookie = session::create_cookie(session.id);

	Ok(([(header::SET_COOKIE, cookie.to_string())], Json(session)))
}

/// Log out
/// Logs out of the authenticated account, invalidating the session.
#[route(tag = tag::AUTH, response(status = 204, description = "Logged out successfully."))]
pub async fn logout(
	State(database): State<Database>,
	session: Session,
) -> Result<impl IntoApiResponse, RouteError> {
	sqlx::query("DELETE FROM sessions WHERE id = $1")
		.bind(session.id)
		.execute(&database)
		.await?;

	// Clear the session cookie
	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		StatusCode::NO_CONTENT,
	))
}

/// Register account
/// Registers a new account, returning an associated session cookie.
#[route(tag = tag::AUTH, response(status = 200, description = "Registered successfully.", shape = "Json<model::Session>"))]
pub async fn register(
	State(state): State<AppState>,
	Json(auth): Json<model::RegisterInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let password = hash_password(&state.hasher, &auth.password).map_err(Error::Argon)?;

	let mut tx = state.database.begin().await?;

	let user_id = sqlx::query_scalar::<_, i32>(
		r#"
			INSERT INTO users (firstname, lastname, username, password, email, contactno, sex)
			VALUES ($1, $2, $3, $4, $5, $6, $7)
			RETURNING id
		"#,
	)
	.bind(&auth.firstname)
	.bind(&auth.lastname)
	.bind(&auth.username)
	.bind(&password)
	.bind(&auth.email)
	.bind(&auth.contactno)
	.bind(&auth.sex)
	.fetch_one(&mut *tx)
	.await
	.map_err(map_duplicate)?;

	let session = sqlx::query_as::<_, model::Session>(
		r#"
			INSERT INTO sessions (user_id) VALUES ($1) RETURNING *
		"#,
	)
	.bind(user_id)
	.fetch_one(&mut *tx)
	.await?;

	tx.commit().await?;

	let cookie = session::create_cookie(session.id);

	Ok(([(header::SET_COOKIE, cookie.to_string())], Json(session)))
}

/// Get user
/// Returns the authenticated user.
#[route(tag = tag::AUTH)]
pub async fn get_me(session: Session) -> Json<model::User> {
	Json(session.user)
}

/// Update user
/// Updates the authenticated user.
#[route(tag = tag::AUTH)]
pub async fn update_me(
	State(database): State<Database>,
	session: Session,
	Json(auth): Json<model::UpdateUserInput>,
) -> Result<Json<model::User>, RouteError> {
	let user = sqlx::query_as::<_, model::User>(
		r#"
			UPDATE users
			SET firstname = COALESCE($1, firstname),
				lastname = COALESCE($2, lastname),
				username = COALESCE($3, username),
				email = COALESCE($4, email),
				contactno = COALESCE($5, contactno),
				sex = COALESCE($6, sex),
				image_src = COALESCE($7, image_src)
			WHERE id = $8
			RETURNING *
		"#,
	)
	.bind(auth.firstname)
	.bind(auth.lastname)
	.bind(auth.username)
	.bind(auth.email)
	.bind(auth.contactno)
	.bind(auth.sex)
	.bind(auth.image_src)
	.bind(session.user.id)
	.fetch_one(&database)
	.await
	.map_err(map_duplicate)?;

	Ok(Json(user))
}

/// Delete user
/// Deletes the authenticated user and their related content. This action is irreversible.
#[route(tag = tag::AUTH)]
pub async fn delete_me(
	State(database): State<Database>,
	session: Session,
) -> Result<impl IntoApiResponse, RouteError> {
	sqlx::query("DELETE FROM users WHERE id = $1")
		.bind(session.user.id)
		.execute(&database)
		.await?;

	// Clear the session cookie
	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		StatusCode::NO_CONTENT,
	))
}
