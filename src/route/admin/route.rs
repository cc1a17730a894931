use axum::extract::State;
use macros::route;

use crate::{
	extract::{Admin, Json, Path},
	openapi::tag,
	route::{article, auth, recipe, toddler},
	AppState, Database,
};

use super::{model, Error, RouteError};

fn map_duplicate(error: sqlx::Error) -> RouteError {
	match auth::duplicate_user_field(&error) {
		Some(field) => Error::Duplicate(field).into(),
		None => RouteError::from(error),
	}
}

/// List users
/// Returns every user, oldest account first.
#[route(tag = tag::ADMIN)]
pub async fn list_users(
	State(database): State<Database>,
	_admin: Admin,
) -> Result<Json<Vec<model::UserRow>>, RouteError> {
	let users = sqlx::query_as::<_, model::UserRow>(
		r#"
			SELECT * FROM users
			ORDER BY id ASC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(users))
}

/// Create user
/// Creates a user account, optionally with the administrator role.
#[route(tag = tag::ADMIN)]
pub async fn create_user(
	State(state): State<AppState>,
	_admin: Admin,
	Json(input): Json<model::CreateUserInput>,
) -> Result<Json<model::UserRow>, RouteError> {
	let password = auth::route::hash_password(&state.hasher, &input.password)
		.map_err(Error::Argon)?;

	let user = sqlx::query_as::<_, auth::model::User>(
		r#"
			INSERT INTO users (firstname, lastname, username, password, email, contactno, sex, image_src, role)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
			RETURNING *
		"#,
	)
	.bind(&input.firstname)
	.bind(&input.lastname)
	.bind(&input.username)
	.bind(&password)
	.bind(&input.email)
	.bind(&input.contactno)
	.bind(&input.sex)
	.bind(&input.image_src)
	.bind(input.role)
	.fetch_one(&state.database)
	.await
	.map_err(map_duplicate)?;

	Ok(Json(user.into()))
}

/// Edit user
/// Updates a user. Submitting values identical to the stored record issues
/// no write and reports `changed: false`; a new password always counts as a
/// change.
#[route(tag = tag::ADMIN)]
pub async fn update_user(
	State(state): State<AppState>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateUserInput>,
) -> Result<Json<model::UpdateOutcome<model::UserRow>>, RouteError> {
	let current = sqlx::query_as::<_, auth::model::User>("SELECT * FROM users WHERE id = $1")
		.bind(path.id)
		.fetch_optional(&state.database)
		.await?
		.ok_or(Error::UnknownRecord("users", path.id))?;

	let mut record = current.clone();

	if let Some(firstname) = input.firstname {
		record.firstname = firstname;
	}
	if let Some(lastname) = input.lastname {
		record.lastname = lastname;
	}
	if let Some(username) = input.username {
		record.username = username;
	}
	if let Some(password) = input.password {
		// A fresh salt makes the hash differ even for an unchanged password,
		// so any password submission registers as a change.
		record.password =
			auth::route::hash_password(&state.hasher, &password).map_err(Error::Argon)?;
	}
	if let Some(email) = input.email {
		record.email = email;
	}
	if let Some(contactno) = input.contactno {
		record.contactno = contactno;
	}
	if let Some(sex) = input.sex {
		record.sex = sex;
	}
	if let Some(image_src) = input.image_src {
		record.image_src = image_src;
	}
	if let Some(role) = input.role {
		record.role = role;
	}

	if record == current {
		return Ok(Json(model::UpdateOutcome {
			changed: false,
			record: record.into(),
		}));
	}

	let record = sqlx::query_as::<_, auth::model::User>(
		r#"
			UPDATE users
			SET firstname = $1, lastname = $2, username = $3, password = $4,
				email = $5, contactno = $6, sex = $7, image_src = $8, role = $9
			WHERE id = $10
			RETURNING *
		"#,
	)
	.bind(&record.firstname)
	.bind(&record.lastname)
	.bind(&record.username)
	.bind(&record.password)
	.bind(&record.email)
	.bind(&record.contactno)
	.bind(&record.sex)
	.bind(&record.image_src)
	.bind(record.role)
	.bind(path.id)
	.fetch_one(&state.database)
	.await
	.map_err(map_duplicate)?;

	Ok(Json(model::UpdateOutcome {
		changed: true,
		record: record.into(),
	}))
}

/// Delete user
/// Deletes a user and, via cascade, their sessions, reviews, comments and
/// child profiles.
#[route(tag = tag::ADMIN)]
pub async fn delete_user(
	State(database): State<Database>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	delete_record(&database, "users", path.id).await
}

/// List recipes
/// Returns every recipe, oldest first.
#[route(tag = tag::ADMIN)]
pub async fn list_recipes(
	State(database): State<Database>,
	_admin: Admin,
) -> Result<Json<Vec<recipe::model::Recipe>>, RouteError> {
	let recipes = sqlx::query_as::<_, recipe::model::Recipe>(
		r#"
			SELECT * FROM recipes
			ORDER BY id ASC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(recipes))
}

/// Create recipe
/// Publishes a new recipe.
#[route(tag = tag::ADMIN)]
pub async fn create_recipe(
	State(database): State<Database>,
	_admin: Admin,
	Json(input): Json<recipe::model::CreateRecipeInput>,
) -> Result<Json<recipe::model::Recipe>, RouteError> {
	let recipe = sqlx::query_as::<_, recipe::model::Recipe>(
		r#"
			INSERT INTO recipes (title, description, ingredients, instructions, author, image_src, favorited)
			VALUES ($1, $2, $3, $4, $5, COALESCE(NULLIF($6, ''), '/recipes/default.jpg'), $7)
			RETURNING *
		"#,
	)
	.bind(&input.title)
	.bind(&input.description)
	.bind(&input.ingredients)
	.bind(&input.instructions)
	.bind(&input.author)
	.bind(&input.image_src)
	.bind(input.favorited)
	.fetch_one(&database)
	.await?;

	Ok(Json(recipe))
}

/// Edit recipe
/// Updates a recipe, skipping the write when nothing changed.
#[route(tag = tag::ADMIN)]
pub async fn update_recipe(
	State(database): State<Database>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
	Json(input): Json<recipe::model::UpdateRecipeInput>,
) -> Result<Json<model::UpdateOutcome<recipe::model::Recipe>>, RouteError> {
	let current = sqlx::query_as::<_, recipe::model::Recipe>("SELECT * FROM recipes WHERE id = $1")
		.bind(path.id)
		.fetch_optional(&database)
		.await?
		.ok_or(Error::UnknownRecord("recipes", path.id))?;

	let mut record = current.clone();

	if let Some(title) = input.title {
		record.title = title;
	}
	if let Some(description) = input.description {
		record.description = description;
	}
	if let Some(ingredients) = input.ingredients {
		record.ingredients = ingredients;
	}
	if let Some(instructions) = input.instructions {
		record.instructions = instructions;
	}
	if let Some(author) = input.author {
		record.author = author;
	}
	if let Some(image_src) = input.image_src {
		record.image_src = image_src;
	}
	if let Some(favorited) = input.favorited {
		record.favorited = favorited;
	}

	if record == current {
		return Ok(Json(model::UpdateOutcome {
			changed: false,
			record,
		}));
	}

	let record = sqlx::query_as::<_, recipe::model::Recipe>(
		r#"
			UPDATE recipes
			SET title = $1, description = $2, ingredients = $3, instructions = $4,
				author = $5, image_src = $6, favorited = $7
			WHERE id = $8
			RETURNING *
		"#,
	)
	.bind(&record.title)
	.bind(&record.description)
	.bind(&record.ingredients)
	.bind(&record.instructions)
	.bind(&record.author)
	.bind(&record.image_src)
	.bind(record.favorited)
	.bind(path.id)
	.fetch_one(&database)
	.await?;

	Ok(Json(model::UpdateOutcome {
		changed: true,
		record,
	}))
}

/// Delete recipe
/// Deletes a recipe and, via cascade, its reviews.
#[route(tag = tag::ADMIN)]
pub async fn delete_recipe(
	State(database): State<Database>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	delete_record(&database, "recipes", path.id).await
}

/// List articles
/// Returns every article, oldest first.
#[route(tag = tag::ADMIN)]
pub async fn list_articles(
	State(database): State<Database>,
	_admin: Admin,
) -> Result<Json<Vec<article::model::Article>>, RouteError> {
	let articles = sqlx::query_as::<_, article::model::Article>(
		r#"
			SELECT * FROM articles
			ORDER BY id ASC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(articles))
}

/// Create article
/// Publishes a new article.
#[route(tag = tag::ADMIN)]
pub async fn create_article(
	State(database): State<Database>,
	_admin: Admin,
	Json(input): Json<article::model::CreateArticleInput>,
) -> Result<Json<article::model::Article>, RouteError> {
	let article = sqlx::query_as::<_, article::model::Article>(
		r#"
			INSERT INTO articles (title, summary, content, category, author, author_specialty, image_src, liked)
			VALUES ($1, $2, $3, $4, $5, $6, COALESCE(NULLIF($7, ''), '/articles/default.jpg'), $8)
			RETURNING *
		"#,
	)
	.bind(&input.title)
	.bind(&input.summary)
	.bind(&input.content)
	.bind(&input.category)
	.bind(&input.author)
	.bind(&input.author_specialty)
	.bind(&input.image_src)
	.bind(input.liked)
	.fetch_one(&database)
	.await?;

	Ok(Json(article))
}

/// Edit article
/// Updates an article, skipping the write when nothing changed.
#[route(tag = tag::ADMIN)]
pub async fn update_article(
	State(database): State<Database>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
	Json(input): Json<article::model::UpdateArticleInput>,
) -> Result<Json<model::UpdateOutcome<article::model::Article>>, RouteError> {
	let current =
		sqlx::query_as::<_, article::model::Article>("SELECT * FROM articles WHERE id = $1")
			.bind(path.id)
			.fetch_optional(&database)
			.await?
			.ok_or(Error::UnknownRecord("articles", path.id))?;

	let mut record = current.clone();

	if let Some(title) = input.title {
		record.title = title;
	}
	if let Some(summary) = input.summary {
		record.summary = summary;
	}
	if let Some(content) = input.content {
		record.content = content;
	}
	if let Some(category) = input.category {
		record.category = category;
	}
	if let Some(author) = input.author {
		record.author = author;
	}
	if let Some(author_specialty) = input.author_specialty {
		record.author_specialty = author_specialty;
	}
	if let Some(image_src) = input.image_src {
		record.image_src = image_src;
	}
	if let Some(liked) = input.liked {
		record.liked = liked;
	}

	if record == current {
		return Ok(Json(model::UpdateOutcome {
			changed: false,
			record,
		}));
	}

	let record = sqlx::query_as::<_, article::model::Article>(
		r#"
			UPDATE articles
			SET title = $1, summary = $2, content = $3, category = $4, author = $5,
				author_specialty = $6, image_src = $7, liked = $8
			WHERE id = $9
			RETURNING *
		"#,
	)
	.bind(&record.title)
	.bind(&record.summary)
	.bind(&record.content)
	.bind(&record.category)
	.bind(&record.author)
	.bind(&record.author_specialty)
	.bind(&record.image_src)
	.bind(record.liked)
	.bind(path.id)
	.fetch_one(&database)
	.await?;

	Ok(Json(model::UpdateOutcome {
		changed: true,
		record,
	}))
}

/// Delete article
/// Deletes an article and, via cascade, its comments.
#[route(tag = tag::ADMIN)]
pub async fn delete_article(
	State(database): State<Database>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	delete_record(&database, "articles", path.id).await
}

/// List child profiles
/// Returns every child profile across all users, oldest first.
#[route(tag = tag::ADMIN)]
pub async fn list_toddlers(
	State(database): State<Database>,
	_admin: Admin,
) -> Result<Json<Vec<toddler::model::Toddler>>, RouteError> {
	let toddlers = sqlx::query_as::<_, toddler::model::Toddler>(
		r#"
			SELECT * FROM toddlers
			ORDER BY id ASC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(toddlers))
}

/// Create child profile
/// Creates a child profile under the named owner.
#[route(tag = tag::ADMIN)]
pub async fn create_toddler(
	State(database): State<Database>,
	_admin: Admin,
	Json(input): Json<model::CreateToddlerInput>,
) -> Result<Json<toddler::model::Toddler>, RouteError> {
	let toddler = sqlx::query_as::<_, toddler::model::Toddler>(
		r#"
			INSERT INTO toddlers (user_id, name, age, gender, height_cm, weight_kg, allergies, preferences, requirements)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
			RETURNING *
		"#,
	)
	.bind(input.user_id)
	.bind(&input.name)
	.bind(input.age)
	.bind(&input.gender)
	.bind(input.height_cm)
	.bind(input.weight_kg)
	.bind(&input.allergies)
	.bind(&input.preferences)
	.bind(&input.requirements)
	.fetch_one(&database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) if d.constraint() == Some("toddlers_user_id_fkey") => {
			Error::UnknownRecord("users", input.user_id).into()
		}
		e => RouteError::from(e),
	})?;

	Ok(Json(toddler))
}

/// Edit child profile
/// Updates a child profile, skipping the write when nothing changed.
#[route(tag = tag::ADMIN)]
pub async fn update_toddler(
	State(database): State<Database>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
	Json(input): Json<toddler::model::UpdateToddlerInput>,
) -> Result<Json<model::UpdateOutcome<toddler::model::Toddler>>, RouteError> {
	let current =
		sqlx::query_as::<_, toddler::model::Toddler>("SELECT * FROM toddlers WHERE id = $1")
			.bind(path.id)
			.fetch_optional(&database)
			.await?
			.ok_or(Error::UnknownRecord("toddlers", path.id))?;

	let mut record = current.clone();

	if let Some(name) = input.name {
		record.name = name;
	}
	if let Some(age) = input.age {
		record.age = age;
	}
	if let Some(gender) = input.gender {
		record.gender = gender;
	}
	if let Some(height_cm) = input.height_cm {
		record.height_cm = height_cm;
	}
	if let Some(weight_kg) = input.weight_kg {
		record.weight_kg = weight_kg;
	}
	if let Some(allergies) = input.allergies {
		record.allergies = allergies;
	}
	if let Some(preferences) = input.preferences {
		record.preferences = preferences;
	}
	if let Some(requirements) = input.requirements {
		record.requirements = requirements;
	}

	if record == current {
		return Ok(Json(model::UpdateOutcome {
			changed: false,
			record,
		}));
	}

	let record = sqlx::query_as::<_, toddler::model::Toddler>(
		r#"
			UPDATE toddlers
			SET name = $1, age = $2, gender = $3, height_cm = $4, weight_kg = $5,
				allergies = $6, preferences = $7, requirements = $8
			WHERE id = $9
			RETURNING *
		"#,
	)
	.bind(&record.name)
	.bind(record.age)
	.bind(&record.gender)
	.bind(record.height_cm)
	.bind(record.weight_kg)
	.bind(&record.allergies)
	.bind(&record.preferences)
	.bind(&record.requirements)
	.bind(path.id)
	.fetch_one(&database)
	.await?;

	Ok(Json(model::UpdateOutcome {
		changed: true,
		record,
	}))
}

/// Delete child profile
/// Deletes any user's child profile.
#[route(tag = tag::ADMIN)]
pub async fn delete_toddler(
	State(database): State<Database>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	delete_record(&database, "toddlers", path.id).await
}

/// List reviews
/// Returns every review across all recipes, with the recipe title and
/// author name resolved.
#[route(tag = tag::ADMIN)]
pub async fn list_reviews(
	State(database): State<Database>,
	_admin: Admin,
) -> Result<Json<Vec<model::ReviewRow>>, RouteError> {
	let reviews = sqlx::query_as::<_, model::ReviewRow>(
		r#"
			SELECT reviews.id, recipes.title AS recipe_title, users.username,
				reviews.rating, reviews.body, reviews.date_updated
			FROM reviews
			JOIN recipes ON recipes.id = reviews.recipe_id
			JOIN users ON users.id = reviews.user_id
			ORDER BY reviews.id ASC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(reviews))
}

/// Delete review
/// Deletes any user's review.
#[route(tag = tag::ADMIN)]
pub async fn delete_review(
	State(database): State<Database>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	delete_record(&database, "reviews", path.id).await
}

/// List comments
/// Returns every comment across all articles, with the article title
/// and author name resolved.
#[route(tag = tag::ADMIN)]
pub async fn list_comments(
	State(database): State<Database>,
	_admin: Admin,
) -> Result<Json<Vec<model::CommentRow>>, RouteError> {
	let comments = sqlx::query_as::<_, model::CommentRow>(
		r#"
			SELECT comments.id, articles.title AS article_title, users.username,
				comments.body, comments.date_updated
			FROM comments
			JOIN articles ON articles.id = comments.article_id
			JOIN users ON users.id = comments.user_id
			ORDER BY comments.id ASC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(comments))
}

/// Delete comment
/// Deletes any user's comment.
#[route(tag = tag::ADMIN)]
pub async fn delete_comment(
	State(database): State<Database>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	delete_record(&database, "comments", path.id).await
}

/// List contact messages
/// Returns every contact message, with the sender's username resolved
/// when the message was submitted while logged in.
#[route(tag = tag::ADMIN)]
pub async fn list_messages(
	State(database): State<Database>,
	_admin: Admin,
) -> Result<Json<Vec<model::MessageRow>>, RouteError> {
	let messages = sqlx::query_as::<_, model::MessageRow>(
		r#"
			SELECT contact.id, contact.name, contact.email, contact.message,
				users.username, contact.date_submitted
			FROM contact
			LEFT JOIN users ON users.id = contact.user_id
			ORDER BY contact.id ASC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(messages))
}

/// Delete contact message
/// Deletes a contact message.
#[route(tag = tag::ADMIN)]
pub async fn delete_message(
	State(database): State<Database>,
	_admin: Admin,
	Path(path): Path<model::IdInput>,
) -> Result<(), RouteError> {
	delete_record(&database, "contact", path.id).await
}

async fn delete_record(database: &Database, table: &'static str, id: i32) -> Result<(), RouteError> {
	// `table` is always one of our own literals, never user input.
	let status = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
		.bind(id)
		.execute(database)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownRecord(table, id).into());
	}

	Ok(())
}
