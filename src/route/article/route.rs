use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Path, Query, Session},
	openapi::tag,
	username, Database,
};

use super::{model, Error, RouteError};

/// List articles
/// Returns a paginated list of articles, newest first, optionally filtered by category.
#[route(tag = tag::ARTICLE)]
pub async fn get_articles(
	State(database): State<Database>,
	Query(paginate): Query<model::Paginate>,
	Query(filter): Query<model::ArticleFilter>,
) -> Result<Json<Vec<model::Article>>, RouteError> {
	let articles = sqlx::query_as::<_, model::Article>(
		r#"
			SELECT * FROM articles
			WHERE $1::text IS NULL OR category = $1
			ORDER BY date_published DESC
			LIMIT $2 OFFSET $3
		"#,
	)
	.bind(filter.category)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(articles))
}

/// Get single article
/// Returns a single article by its unique id.
#[route(tag = tag::ARTICLE)]
pub async fn get_article(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Article>, RouteError> {
	let article = sqlx::query_as::<_, model::Article>(
		r#"
			SELECT * FROM articles
			WHERE id = $1
		"#,
	)
	.bind(path.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(article.ok_or(Error::UnknownArticle(path.id))?))
}

/// Toggle like
/// Flips the liked flag of an article and returns the updated article.
/// Requires authentication; anonymous callers are rejected before any write.
#[route(tag = tag::ARTICLE)]
pub async fn toggle_like(
	State(database): State<Database>,
	_session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Article>, RouteError> {
	// A single atomic flip: exactly the targeted row changes.
	let article = sqlx::query_as::<_, model::Article>(
		r#"
			UPDATE articles
			SET liked = NOT liked
			WHERE id = $1
			RETURNING *
		"#,
	)
	.bind(path.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(article.ok_or(Error::UnknownArticle(path.id))?))
}

/// List comments
/// Returns every comment of an article, oldest first, with resolved author names.
#[route(tag = tag::ARTICLE)]
pub async fn get_comments(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::CommentList>, RouteError> {
	let comments = sqlx::query_as::<_, model::Comment>(
		r#"
			SELECT * FROM comments
			WHERE article_id = $1
			ORDER BY id ASC
		"#,
	)
	.bind(path.id)
	.fetch_all(&database)
	.await?;

	let authors =
		username::resolve_or_empty(&database, comments.iter().map(|comment| comment.user_id)).await;

	Ok(Json(model::CommentList { comments, authors }))
}

/// Create comment
/// Creates a comment on an article. Repeat comments by the same user are allowed.
#[route(tag = tag::ARTICLE)]
pub async fn create_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			INSERT INTO comments (article_id, user_id, body)
			VALUES ($1, $2, $3)
			RETURNING *
		"#,
	)
	.bind(path.id)
	.bind(session.user.id)
	.bind(&input.body)
	.fetch_one(&database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) => match d.constraint() {
			Some("comments_article_id_fkey") => Error::UnknownArticle(path.id).into(),
			_ => RouteError::from(e),
		},
		e => RouteError::from(e),
	})?;

	Ok(Json(comment))
}

/// Update comment
/// Updates a comment's body. Only the author can edit a comment.
#[route(tag = tag::ARTICLE)]
pub async fn update_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			UPDATE comments
			SET body = COALESCE($1, body), date_updated = now()
			WHERE id = $2 AND user_id = $3
			RETURNING *
		"#,
	)
	.bind(input.body)
	.bind(path.id)
	.bind(session.user.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(comment.ok_or(Error::UnknownComment(path.id))?))
}

/// Delete comment
/// Deletes a comment. Only the author can delete their comment here; an
/// administrator deletes through the admin tables.
#[route(tag = tag::ARTICLE)]
pub async fn delete_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	let status = sqlx::query(
		r#"
			DELETE FROM comments
			WHERE id = $1 AND user_id = $2
		"#,
	)
	.bind(path.id)
	.bind(session.user.id)
	.execute(&database)
	.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownComment(path.id).into());
	}

	Ok(())
}
