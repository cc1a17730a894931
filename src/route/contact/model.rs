use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A message submitted through the contact form, by a visitor or a
/// logged-in user.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct ContactMessage {
	/// The unique identifier of the message.
	#[serde(skip_deserializing)]
	pub id: i32,
	#[validate(length(min = 1, max = 128))]
	pub name: String,
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 1, max = 2000))]
	pub message: String,
	/// The sender, when the message was submitted while logged in.
	#[serde(skip_deserializing)]
	pub user_id: Option<i32>,
	/// The submission time of the message.
	#[serde(skip_deserializing)]
	pub date_submitted: chrono::DateTime<chrono::Utc>,
}
