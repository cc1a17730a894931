use axum::extract::State;
use macros::route;

use crate::{
	error::AppError,
	extract::{Json, Session},
	openapi::tag,
	Database,
};

use super::model;

/// Submit contact message
/// Stores a contact-form message. The sender's identity is attached when a
/// session cookie is present, and left empty otherwise.
#[route(tag = tag::CONTACT)]
pub async fn create_message(
	State(database): State<Database>,
	session: Option<Session>,
	Json(input): Json<model::CreateContactMessageInput>,
) -> Result<Json<model::ContactMessage>, AppError> {
	let message = sqlx::query_as::<_, model::ContactMessage>(
		r#"
			INSERT INTO contact (name, email, message, user_id)
			VALUES ($1, $2, $3, $4)
			RETURNING *
		"#,
	)
	.bind(&input.name)
	.bind(&input.email)
	.bind(&input.message)
	.bind(session.map(|session| session.user.id))
	.fetch_one(&database)
	.await?;

	Ok(Json(message))
}
