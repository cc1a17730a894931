use std::borrow::Cow;

use axum::{
	body::Body,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message presented to the client.
///
/// `content` is a stable, machine-readable code. `field` is set when the
/// error concerns one input field (e.g. a duplicate-key conflict), and
/// `details` carries any extra context as a JSON object.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	pub content: Cow<'a, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
	pub success: bool,
	pub errors: Vec<Message<'a>>,
}

/// The shape of a route-specific error: a status code and a list of
/// client-safe messages. The [`std::fmt::Display`] output is never sent to
/// the client, so it may contain sensitive information.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;

	fn response(&self) -> Response<Body> {
		(
			self.status(),
			Json(ErrorResponse {
				success: false,
				errors: self.errors(),
			}),
		)
			.into_response()
	}
}

/// Errors that can occur in any route: failed input validation, malformed
/// requests, rate limiting and database failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error")]
	Json(axum_jsonschema::JsonSchemaRejection),
	#[error("query error: {0}")]
	Query(#[from] axum::extract::rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] axum::extract::rejection::PathRejection),
	#[error("rate limited: {0}")]
	RateLimit(#[from] tower_governor::GovernorError),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl From<axum_jsonschema::JsonSchemaRejection> for AppError {
	fn from(rejection: axum_jsonschema::JsonSchemaRejection) -> Self {
		Self::Json(rejection)
	}
}

impl AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Query(..) | Self::Path(..) => {
				StatusCode::BAD_REQUEST
			}
			Self::RateLimit(tower_governor::GovernorError::TooManyRequests { .. }) => {
				StatusCode::TOO_MANY_REQUESTS
			}
			Self::RateLimit(..) | Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| Message {
						content: error.code.clone(),
						field: Some(Cow::Borrowed(field)),
						details: None,
					})
				})
				.collect(),
			Self::Json(..) => vec![Message {
				content: "invalid_json".into(),
				field: None,
				details: None,
			}],
			Self::Query(..) => vec![Message {
				content: "invalid_query".into(),
				field: None,
				details: None,
			}],
			Self::Path(..) => vec![Message {
				content: "invalid_path".into(),
				field: None,
				details: None,
			}],
			Self::RateLimit(tower_governor::GovernorError::TooManyRequests { .. }) => {
				vec![Message {
					content: "too_many_requests".into(),
					field: None,
					details: None,
				}]
			}
			// Remote failures are logged, never detailed to the client.
			Self::RateLimit(..) | Self::Database(..) => Vec::new(),
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		if let Self::Database(ref error) = self {
			tracing::error!(%error, "database error");
		}

		(
			self.status(),
			Json(ErrorResponse {
				success: false,
				errors: self.errors(),
			}),
		)
			.into_response()
	}
}

/// Error type returned by route handlers: either a route-specific error
/// (implementing [`ErrorShape`]) or an [`AppError`].
#[derive(Debug, thiserror::Error)]
pub enum RouteError<E> {
	#[error(transparent)]
	App(AppError),
	#[error(transparent)]
	Route(E),
}

impl<E: ErrorShape> From<E> for RouteError<E> {
	fn from(error: E) -> Self {
		Self::Route(error)
	}
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<sqlx::Error> for RouteError<E> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(AppError::Database(error))
	}
}

impl<E> From<validator::ValidationErrors> for RouteError<E> {
	fn from(errors: validator::ValidationErrors) -> Self {
		Self::App(AppError::Validation(errors))
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => error.response(),
		}
	}
}

impl<E> aide::OperationOutput for RouteError<E> {
	type Inner = Self;
}

impl aide::OperationOutput for AppError {
	type Inner = Self;
}

#[cfg(test)]
mod test {
	use super::*;

	#[derive(Debug, thiserror::Error)]
	enum TestError {
		#[error("nope")]
		Nope,
	}

	impl ErrorShape for TestError {
		fn status(&self) -> StatusCode {
			StatusCode::IM_A_TEAPOT
		}

		fn errors(&self) -> Vec<Message<'_>> {
			vec![Message {
				content: "nope".into(),
				field: Some("field".into()),
				details: None,
			}]
		}
	}

	#[test]
	fn test_route_error_prefers_route_status() {
		let error = RouteError::from(TestError::Nope);
		let response = error.into_response();

		assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
	}

	#[test]
	fn test_database_error_body_is_generic() {
		let error = AppError::Database(sqlx::Error::RowNotFound);

		assert!(error.errors().is_empty());
		assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[test]
	fn test_message_serializes_without_empty_fields() {
		let message = Message {
			content: "unknown_recipe".into(),
			field: None,
			details: None,
		};

		let value = serde_json::to_value(&message).unwrap();

		assert_eq!(value, serde_json::json!({ "content": "unknown_recipe" }));
	}
}
