use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Path, Query, Session},
	openapi::tag,
	username, Database,
};

use super::{model, Error, RouteError};

/// List recipes
/// Returns a paginated list of recipes, newest first, optionally filtered by the favorited flag.
#[route(tag = tag::RECIPE)]
pub async fn get_recipes(
	State(database): State<Database>,
	Query(paginate): Query<model::Paginate>,
	Query(filter): Query<model::RecipeFilter>,
) -> Result<Json<Vec<model::Recipe>>, RouteError> {
	let recipes = sqlx::query_as::<_, model::Recipe>(
		r#"
			SELECT * FROM recipes
			WHERE $1::bool IS NULL OR favorited = $1
			ORDER BY date_published DESC
			LIMIT $2 OFFSET $3
		"#,
	)
	.bind(filter.favorited)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(recipes))
}

/// Get single recipe
/// Returns a single recipe by its unique id.
#[route(tag = tag::RECIPE)]
pub async fn get_recipe(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Recipe>, RouteError> {
	let recipe = sqlx::query_as::<_, model::Recipe>(
		r#"
			SELECT * FROM recipes
			WHERE id = $1
		"#,
	)
	.bind(path.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(recipe.ok_or(Error::UnknownRecipe(path.id))?))
}

/// Toggle favorite
/// Flips the favorited flag of a recipe and returns the updated recipe.
/// Requires authentication; anonymous callers are rejected before any write.
#[route(tag = tag::RECIPE)]
pub async fn toggle_favorite(
	State(database): State<Database>,
	_session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Recipe>, RouteError> {
	// A single atomic flip: exactly the targeted row changes.
	let recipe = sqlx::query_as::<_, model::Recipe>(
		r#"
			UPDATE recipes
			SET favorited = NOT favorited
			WHERE id = $1
			RETURNING *
		"#,
	)
	.bind(path.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(recipe.ok_or(Error::UnknownRecipe(path.id))?))
}

/// List reviews
/// Returns every review of a recipe, oldest first, with resolved author names.
#[route(tag = tag::RECIPE)]
pub async fn get_reviews(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::ReviewList>, RouteError> {
	let reviews = sqlx::query_as::<_, model::Review>(
		r#"
			SELECT * FROM reviews
			WHERE recipe_id = $1
			ORDER BY id ASC
		"#,
	)
	.bind(path.id)
	.fetch_all(&database)
	.await?;

	let authors =
		username::resolve_or_empty(&database, reviews.iter().map(|review| review.user_id)).await;

	Ok(Json(model::ReviewList { reviews, authors }))
}

/// Create review
/// Creates a review of a recipe. Each user may review a recipe at most once.
#[route(tag = tag::RECIPE)]
pub async fn create_review(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::CreateReviewInput>,
) -> Result<Json<model::Review>, RouteError> {
	let review = sqlx::query_as::<_, model::Review>(
		r#"
			INSERT INTO reviews (recipe_id, user_id, rating, body)
			VALUES ($1, $2, $3, $4)
			RETURNING *
		"#,
	)
	.bind(path.id)
	.bind(session.user.id)
	.bind(input.rating)
	.bind(&input.body)
	.fetch_one(&database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) => match d.constraint() {
			Some("reviews_recipe_user_key") => Error::AlreadyReviewed.into(),
			Some("reviews_recipe_id_fkey") => Error::UnknownRecipe(path.id).into(),
			_ => RouteError::from(e),
		},
		e => RouteError::from(e),
	})?;

	Ok(Json(review))
}

/// Update review
/// Updates a review's rating or body. Only the author can edit a review.
#[route(tag = tag::RECIPE)]
pub async fn update_review(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateReviewInput>,
) -> Result<Json<model::Review>, RouteError> {
	let review = sqlx::query_as::<_, model::Review>(
		r#"
			UPDATE reviews
			SET rating = COALESCE($1, rating), body = COALESCE($2, body), date_updated = now()
			WHERE id = $3 AND user_id = $4
			RETURNING *
		"#,
	)
	.bind(input.rating)
	.bind(input.body)
	.bind(path.id)
	.bind(session.user.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(review.ok_or(Error::UnknownReview(path.id))?))
}

/// Delete review
/// Deletes a review. Only the author can delete their review here; an
/// administrator deletes through the admin tables.
#[route(tag = tag::RECIPE)]
pub async fn delete_review(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	let status = sqlx::query(
		r#"
			DELETE FROM reviews
			WHERE id = $1 AND user_id = $2
		"#,
	)
	.bind(path.id)
	.bind(session.user.id)
	.execute(&database)
	.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownReview(path.id).into());
	}

	Ok(())
}
