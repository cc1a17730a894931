use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
	if username.chars().any(|c| !c.is_alphanumeric()) {
		return Err(ValidationError::new("username must be alphanumeric"));
	}

	Ok(())
}

/// Passwords need at least one lowercase letter, one uppercase letter, one
/// digit and one symbol.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
	let lower = password.chars().any(|c| c.is_ascii_lowercase());
	let upper = password.chars().any(|c| c.is_ascii_uppercase());
	let digit = password.chars().any(|c| c.is_ascii_digit());
	let symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

	if !(lower && upper && digit && symbol) {
		return Err(ValidationError::new("password does not meet the criteria"));
	}

	Ok(())
}

pub fn validate_contactno(contactno: &str) -> Result<(), ValidationError> {
	if contactno.is_empty() || contactno.chars().any(|c| !c.is_ascii_digit()) {
		return Err(ValidationError::new("contact number must be numeric"));
	}

	Ok(())
}

/// The role of a user, deciding whether the admin tables are reachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
	#[default]
	User,
	Admin,
}

/// A single user.
#[model]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	#[serde(skip_deserializing)]
	pub id: i32,
	#[validate(length(min = 1, max = 64))]
	pub firstname: String,
	#[validate(length(min = 1, max = 64))]
	pub lastname: String,
	/// The username that is displayed next to reviews and comments.
	#[validate(length(min = 3, max = 16), custom(function = "validate_username"))]
	pub username: String,
	/// The argon2 hash of the password, in PHC format.
	#[serde(skip)]
	pub password: String,
	/// The user's primary email address, used for logging in.
	#[serde(skip_serializing)]
	#[validate(email)]
	pub email: String,
	#[validate(custom(function = "validate_contactno"))]
	pub contactno: String,
	pub sex: String,
	/// Left empty to fall back to the default avatar.
	#[serde(default)]
	pub image_src: String,
	/// The user's role.
	#[serde(skip_deserializing)]
	pub role: Role,
	/// The creation time of the user.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Session {
	/// The session id.
	#[serde(rename = "session_id")]
	pub id: Uuid,
	/// The user that owns the session.
	#[serde(skip)]
	#[allow(dead_code)]
	pub user_id: i32,
	/// The creation time of the session.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct RegisterInput {
	#[validate(length(min = 1, max = 64))]
	pub firstname: String,
	#[validate(length(min = 1, max = 64))]
	pub lastname: String,
	/// The username that is displayed next to reviews and comments.
	#[validate(length(min = 3, max = 16), custom(function = "validate_username"))]
	pub username: String,
	#[validate(
		length(min = 8, max = 128),
		custom(function = "validate_password")
	)]
	pub password: String,
	/// Must match `password`.
	#[validate(must_match(other = "password"))]
	pub conpassword: String,
	#[validate(email)]
	pub email: String,
	#[validate(custom(function = "validate_contactno"))]
	pub contactno: String,
	pub sex: String,
}

#[cfg(test)]
mod test {
	use validator::Validate;

	use super::*;

	fn input() -> RegisterInput {
		RegisterInput {
			firstname: "John".into(),
			lastname: "Smith".into(),
			username: "john".into(),
			password: "Hunter2hunter!".into(),
			conpassword: "Hunter2hunter!".into(),
			email: "john@smith.com".into(),
			contactno: "5550001111".into(),
			sex: "male".into(),
		}
	}

	#[test]
	fn test_register_input_accepts_valid_values() {
		assert!(input().validate().is_ok());
	}

	#[test]
	fn test_password_requires_all_character_classes() {
		for password in ["alllowercase1!", "ALLUPPERCASE1!", "NoDigitsHere!", "NoSymbols123"] {
			let mut input = input();
			input.password = password.into();
			input.conpassword = password.into();

			assert!(input.validate().is_err(), "{password} should be rejected");
		}
	}

	#[test]
	fn test_mismatched_confirmation_is_rejected() {
		let mut input = input();
		input.conpassword = "Different1!".into();

		assert!(input.validate().is_err());
	}

	#[test]
	fn test_contact_number_must_be_numeric() {
		let mut input = input();
		input.contactno = "555-0011".into();

		assert!(input.validate().is_err());
	}
}
