pub use crate::route::model::IdInput;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::route::auth::model::{
	validate_contactno, validate_password, validate_username, Role, User,
};

fn default_avatar() -> String {
	"/users/avatar.jpg".into()
}

fn default_role() -> Role {
	Role::User
}

/// The result of an admin table edit.
///
/// When the submitted values are identical to the stored record, no write is
/// issued and `changed` is `false`; the client surfaces this as a
/// "no changes made" notice instead of a save confirmation.
#[derive(Debug, Serialize, JsonSchema)]
pub struct UpdateOutcome<T> {
	pub changed: bool,
	pub record: T,
}

/// A user as shown in the admin table. Unlike the public user shape, this
/// one carries the email address so it can be edited.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct UserRow {
	pub id: i32,
	pub firstname: String,
	pub lastname: String,
	pub username: String,
	pub email: String,
	pub contactno: String,
	pub sex: String,
	pub image_src: String,
	pub role: Role,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserRow {
	fn from(user: User) -> Self {
		Self {
			id: user.id,
			firstname: user.firstname,
			lastname: user.lastname,
			username: user.username,
			email: user.email,
			contactno: user.contactno,
			sex: user.sex,
			image_src: user.image_src,
			role: user.role,
			created_at: user.created_at,
		}
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct CreateUserInput {
	#[validate(length(min = 1, max = 64))]
	pub firstname: String,
	#[validate(length(min = 1, max = 64))]
	pub lastname: String,
	#[validate(length(min = 3, max = 16), custom(function = "validate_username"))]
	pub username: String,
	#[validate(
		length(min = 8, max = 128),
		custom(function = "validate_password")
	)]
	pub password: String,
	#[validate(email)]
	pub email: String,
	#[validate(custom(function = "validate_contactno"))]
	pub contactno: String,
	pub sex: String,
	#[serde(default = "default_avatar")]
	pub image_src: String,
	#[serde(default = "default_role")]
	pub role: Role,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct UpdateUserInput {
	#[validate(length(min = 1, max = 64))]
	pub firstname: Option<String>,
	#[validate(length(min = 1, max = 64))]
	pub lastname: Option<String>,
	#[validate(length(min = 3, max = 16), custom(function = "validate_username"))]
	pub username: Option<String>,
	/// When set, the password is re-hashed and replaced.
	#[validate(
		length(min = 8, max = 128),
		custom(function = "validate_password")
	)]
	pub password: Option<String>,
	#[validate(email)]
	pub email: Option<String>,
	#[validate(custom(function = "validate_contactno"))]
	pub contactno: Option<String>,
	pub sex: Option<String>,
	pub image_src: Option<String>,
	pub role: Option<Role>,
}

/// Admin child-profile creation names its owner explicitly, unlike the
/// user-facing endpoint which always creates under the session user.
#[derive(Deserialize, Validate, JsonSchema)]
pub struct CreateToddlerInput {
	pub user_id: i32,
	#[validate(length(min = 1, max = 64))]
	pub name: String,
	#[validate(range(min = 0, max = 12))]
	pub age: i32,
	pub gender: String,
	#[validate(range(min = 30.0, max = 200.0))]
	pub height_cm: Option<f32>,
	#[validate(range(min = 2.0, max = 100.0))]
	pub weight_kg: Option<f32>,
	#[serde(default)]
	pub allergies: String,
	#[serde(default)]
	pub preferences: String,
	#[serde(default)]
	pub requirements: String,
}

/// A review as shown in the admin table, with its recipe and author
/// resolved to display names.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct ReviewRow {
	pub id: i32,
	pub recipe_title: String,
	pub username: String,
	pub rating: i32,
	pub body: String,
	pub date_updated: chrono::DateTime<chrono::Utc>,
}

/// A comment as shown in the admin table.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct CommentRow {
	pub id: i32,
	pub article_title: String,
	pub username: String,
	pub body: String,
	pub date_updated: chrono::DateTime<chrono::Utc>,
}

/// A contact message as shown in the admin table. `username` is empty for
/// anonymous submissions.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct MessageRow {
	pub id: i32,
	pub name: String,
	pub email: String,
	pub message: String,
	pub username: Option<String>,
	pub date_submitted: chrono::DateTime<chrono::Utc>,
}
