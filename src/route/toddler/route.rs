use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Path, Session},
	openapi::tag,
	Database,
};

use super::{model, Error, RouteError};

/// List child profiles
/// Returns every child profile owned by the authenticated user.
#[route(tag = tag::TODDLER)]
pub async fn get_toddlers(
	State(database): State<Database>,
	session: Session,
) -> Result<Json<Vec<model::Toddler>>, RouteError> {
	let toddlers = sqlx::query_as::<_, model::Toddler>(
		r#"
			SELECT * FROM toddlers
			WHERE user_id = $1
			ORDER BY id ASC
		"#,
	)
	.bind(session.user.id)
	.fetch_all(&database)
	.await?;

	Ok(Json(toddlers))
}

/// Create child profile
/// Creates a child profile owned by the authenticated user.
#[route(tag = tag::TODDLER)]
pub async fn create_toddler(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreateToddlerInput>,
) -> Result<Json<model::Toddler>, RouteError> {
	let toddler = sqlx::query_as::<_, model::Toddler>(
		r#"
			INSERT INTO toddlers (user_id, name, age, gender, height_cm, weight_kg, allergies, preferences, requirements)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
			RETURNING *
		"#,
	)
	.bind(session.user.id)
	.bind(&input.name)
	.bind(input.age)
	.bind(&input.gender)
	.bind(input.height_cm)
	.bind(input.weight_kg)
	.bind(&input.allergies)
	.bind(&input.preferences)
	.bind(&input.requirements)
	.fetch_one(&database)
	.await?;

	Ok(Json(toddler))
}

/// Update child profile
/// Updates a child profile. Only the owner can edit it.
#[route(tag = tag::TODDLER)]
pub async fn update_toddler(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateToddlerInput>,
) -> Result<Json<model::Toddler>, RouteError> {
	let toddler = sqlx::query_as::<_, model::Toddler>(
		r#"
			UPDATE toddlers
			SET
				name = COALESCE($1, name),
				age = COALESCE($2, age),
				gender = COALESCE($3, gender),
				height_cm = COALESCE($4, height_cm),
				weight_kg = COALESCE($5, weight_kg),
				allergies = COALESCE($6, allergies),
				preferences = COALESCE($7, preferences),
				requirements = COALESCE($8, requirements)
			WHERE id = $9 AND user_id = $10
			RETURNING *
		"#,
	)
	.bind(input.name)
	.bind(input.age)
	.bind(input.gender)
	.bind(input.height_cm)
	.bind(input.weight_kg)
	.bind(input.allergies)
	.bind(input.preferences)
	.bind(input.requirements)
	.bind(path.id)
	.bind(session.user.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(toddler.ok_or(Error::UnknownToddler(path.id))?))
}

/// Delete child profile
/// Deletes a child profile. Only the owner can delete it.
#[route(tag = tag::TODDLER)]
pub async fn delete_toddler(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	let status = sqlx::query(
		r#"
			DELETE FROM toddlers
			WHERE id = $1 AND user_id = $2
		"#,
	)
	.bind(path.id)
	.bind(session.user.id)
	.execute(&database)
	.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownToddler(path.id).into());
	}

	Ok(())
}
