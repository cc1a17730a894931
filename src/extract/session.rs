use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use uuid::Uuid;

use crate::{
	error::RouteError,
	openapi::SECURITY_SCHEME_SESSION,
	route::auth::{self, model::Role},
	session, Database,
};

/// Extracts the session and related user from the request.
///
/// This is the single authentication gate: every operation that requires an
/// identity (reaction toggles, posting, profile management) takes a
/// [`Session`] parameter, so an anonymous caller is rejected with 401 before
/// the handler runs and no write is ever attempted.
///
/// If no cookie is present, [`auth::Error::NoSessionCookie`] is returned.
/// If the session is invalid, [`auth::Error::InvalidSessionCookie`] is returned.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub id: Uuid,
	pub user: auth::model::User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	/// Extracts the session from the request using the session cookie.
	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let cookies = parts
			.headers
			.get_all(header::COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok());

		let session_id = cookies
			.flat_map(cookie::Cookie::split_parse)
			.filter_map(Result::ok)
			.find(|cookie| cookie.name() == session::COOKIE_NAME)
			.ok_or(auth::Error::NoSessionCookie)?;

		let session_id = Uuid::parse_str(session_id.value())
			.map_err(|_| auth::Error::InvalidSessionCookie)?;

		let database = Database::from_ref(state);
		let user = sqlx::query_as::<_, auth::model::User>(
			r#"
				SELECT * FROM users WHERE id = (
					SELECT user_id FROM sessions WHERE id = $1
				)
			"#,
		)
		.bind(session_id)
		.fetch_optional(&database)
		.await?;

		let user = user.ok_or(auth::Error::InvalidSessionCookie)?;

		Ok(Session {
			id: session_id,
			user,
		})
	}
}

impl OperationInput for Session {
	/// Adds a session cookie requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([[
			(SECURITY_SCHEME_SESSION.to_string(), Vec::new()),
		]
		.into_iter()
		.collect()]);
	}
}

/// A [`Session`] whose user has the administrator role.
///
/// Used by the admin tables; a regular user is rejected with 403.
#[derive(Debug)]
pub struct Admin {
	pub session: Session,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Admin
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let session = Session::from_request_parts(parts, state).await?;

		if session.user.role != Role::Admin {
			return Err(auth::Error::NotAnAdministrator.into());
		}

		Ok(Admin { session })
	}
}

impl OperationInput for Admin {
	fn operation_input(ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		Session::operation_input(ctx, operation);
	}
}
