pub use crate::route::model::IdInput;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A child profile, owned by the user that created it.
#[model]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Toddler {
	/// The unique identifier of the child profile.
	#[serde(skip_deserializing)]
	pub id: i32,
	/// The user that owns the profile.
	#[serde(skip_deserializing)]
	pub user_id: i32,
	#[validate(length(min = 1, max = 64))]
	pub name: String,
	/// Age in years.
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
	/// Special dietary or care requirements.
	#[serde(default)]
	pub requirements: String,
}
