pub use axum_test::TestServer;
pub use serde_json::json;

pub use crate::Database;

use argon2::Argon2;
use axum_test::TestServerConfig;

/// Builds a test server around the full router.
///
/// Rate limiting is left out: it keys on the peer address, which does not
/// exist behind the mock transport.
pub fn app(pool: Database) -> TestServer {
	let state = crate::State {
		database: pool,
		hasher: Argon2::default(),
	};

	let config = TestServerConfig {
		save_cookies: true,
		default_content_type: Some("application/json".into()),
		..TestServerConfig::default()
	};

	TestServer::new_with_config(crate::app(state, None), config).unwrap()
}

/// Registers a user through the public signup endpoint, leaving the server
/// logged in as that user.
///
/// The email and full name are derived from the username so that registering
/// several users never trips the uniqueness constraints.
pub async fn register(app: &TestServer, username: &str) {
	let response = app
		.post("/auth/register")
		.json(&json!({
			"firstname": username,
			"lastname": format!("{username}son"),
			"username": username,
			"password": "Hunter2hunter!",
			"conpassword": "Hunter2hunter!",
			"email": format!("{username}@example.com"),
			"contactno": "5550001111",
			"sex": "female",
		}))
		.await;

	assert_eq!(response.status_code(), 200, "{}", response.text());
}

/// Grants the administrator role directly in the database.
pub async fn promote(pool: &Database, username: &str) {
	sqlx::query("UPDATE users SET role = 'admin' WHERE username = $1")
		.bind(username)
		.execute(pool)
		.await
		.unwrap();
}

pub async fn seed_user(pool: &Database, username: &str, email: &str) -> i32 {
	sqlx::query_scalar::<_, i32>(
		r#"
			INSERT INTO users (firstname, lastname, username, password, email, contactno, sex)
			VALUES ($1, $2, $3, '', $4, '5550000000', 'female')
			RETURNING id
		"#,
	)
	.bind(username)
	.bind(format!("{username}son"))
	.bind(username)
	.bind(email)
	.fetch_one(pool)
	.await
	.unwrap()
}

pub async fn seed_recipe(pool: &Database, title: &str) -> i32 {
	sqlx::query_scalar::<_, i32>(
		r#"
			INSERT INTO recipes (title, description, ingredients, instructions, author)
			VALUES ($1, 'A simple toddler meal.', 'banana', 'mash it', 'Kitchen team')
			RETURNING id
		"#,
	)
	.bind(title)
	.fetch_one(pool)
	.await
	.unwrap()
}

pub async fn seed_article(pool: &Database, title: &str) -> i32 {
	sqlx::query_scalar::<_, i32>(
		r#"
			INSERT INTO articles (title, summary, content, category, author, author_specialty)
			VALUES ($1, 'Short summary.', 'Full article text.', 'nutrition', 'Dr. Lee', 'Pediatric nutrition')
			RETURNING id
		"#,
	)
	.bind(title)
	.fetch_one(pool)
	.await
	.unwrap()
}
