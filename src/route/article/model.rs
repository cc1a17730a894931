pub use crate::route::model::{IdInput, Paginate};

use std::collections::HashMap;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A child-health article.
///
/// `liked` is a flag on the article itself, flipped by the like toggle; it
/// is not tracked per user.
#[model]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Article {
	/// The unique identifier of the article.
	#[serde(skip_deserializing)]
	pub id: i32,
	#[validate(length(min = 1, max = 128))]
	pub title: String,
	pub summary: String,
	pub content: String,
	/// A free-form category used for filtering, e.g. "nutrition".
	#[validate(length(min = 1, max = 64))]
	pub category: String,
	#[validate(length(min = 1, max = 128))]
	pub author: String,
	/// The author's specialty, displayed next to their name.
	pub author_specialty: String,
	/// Left empty to fall back to the default article image.
	#[serde(default)]
	pub image_src: String,
	#[serde(default)]
	pub liked: bool,
	#[serde(skip_deserializing)]
	pub date_published: chrono::DateTime<chrono::Utc>,
}

/// A comment on one article by one user. Users may comment on the same
/// article any number of times.
#[model]
#[derive(Debug, PartialEq, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Comment {
	/// The unique identifier of the comment.
	#[serde(skip_deserializing)]
	pub id: i32,
	/// The article the comment belongs to.
	#[serde(skip_deserializing)]
	pub article_id: i32,
	/// The user that wrote the comment.
	#[serde(skip_deserializing)]
	pub user_id: i32,
	#[validate(length(min = 1, max = 250))]
	pub body: String,
	/// The time of the last edit.
	#[serde(skip_deserializing)]
	pub date_updated: chrono::DateTime<chrono::Utc>,
}

/// The comments of one article together with the resolved author names.
#[derive(Debug, Serialize, JsonSchema)]
pub struct CommentList {
	pub comments: Vec<Comment>,
	/// Maps `user_id` to a display name. Absent entries render blank.
	pub authors: HashMap<i32, String>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct ArticleFilter {
	/// When set, only articles in this category are returned.
	#[validate(length(min = 1, max = 64))]
	pub category: Option<String>,
}
