pub use crate::route::model::{IdInput, Paginate};

use std::collections::HashMap;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single toddler recipe.
///
/// `favorited` is a flag on the recipe itself, flipped by the favorite
/// toggle; it is not tracked per user.
#[model]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Recipe {
	/// The unique identifier of the recipe.
	#[serde(skip_deserializing)]
	pub id: i32,
	/// The display title of the recipe.
	#[validate(length(min = 1, max = 128))]
	pub title: String,
	pub description: String,
	pub ingredients: String,
	pub instructions: String,
	/// The recipe author's display name.
	#[validate(length(min = 1, max = 128))]
	pub author: String,
	/// Left empty to fall back to the default recipe image.
	#[serde(default)]
	pub image_src: String,
	#[serde(default)]
	pub favorited: bool,
	/// The publication time of the recipe.
	#[serde(skip_deserializing)]
	pub date_published: chrono::DateTime<chrono::Utc>,
}

/// A review of one recipe by one user. A user may review a recipe at most
/// once.
#[model]
#[derive(Debug, PartialEq, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Review {
	/// The unique identifier of the review.
	#[serde(skip_deserializing)]
	pub id: i32,
	/// The recipe under review.
	#[serde(skip_deserializing)]
	pub recipe_id: i32,
	/// The user that wrote the review.
	#[serde(skip_deserializing)]
	pub user_id: i32,
	/// A rating from 1 to 10.
	#[validate(range(min = 1, max = 10))]
	pub rating: i32,
	#[validate(length(min = 1, max = 250))]
	pub body: String,
	/// The time of the last edit.
	#[serde(skip_deserializing)]
	pub date_updated: chrono::DateTime<chrono::Utc>,
}

/// The reviews of one recipe together with the resolved author names.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ReviewList {
	pub reviews: Vec<Review>,
	/// Maps `user_id` to a display name. Absent entries render blank.
	pub authors: HashMap<i32, String>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct RecipeFilter {
	/// When set, only recipes whose `favorited` flag matches are returned.
	pub favorited: Option<bool>,
}
