#![warn(clippy::pedantic)]

mod error;
mod extract;
mod openapi;
mod ratelimit;
mod route;
mod session;
#[cfg(test)]
mod test;
mod trace;
mod username;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use argon2::Argon2;
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as a database connection pool, a hash configuration (if it's expensive
/// to create), or a cache client.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
}

/// Builds the application router and the `OpenAPI` document.
///
/// `auth_limit` is the rate limit applied to the credential endpoints. It is
/// `None` in tests: the limiter keys on the peer address, which the mock
/// transport does not provide.
fn app(state: State, auth_limit: Option<ratelimit::RateLimit>) -> Router {
	let mut api = OpenApi::default();

	let auth = route::auth::routes();
	let auth = match auth_limit {
		Some(config) => auth.layer(GovernorLayer { config }),
		None => auth,
	};

	ApiRouter::new()
		.nest("/auth", auth)
		.nest("/recipes", route::recipe::routes())
		.nest("/articles", route::article::routes())
		.nest("/contact", route::contact::routes())
		.nest("/toddlers", route::toddler::routes())
		.nest("/admin", route::admin::routes())
		.nest_api_service("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(
			ServiceBuilder::new()
				.layer(Extension(Arc::new(api)))
				.layer(TraceLayer::new_for_http())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let _guard = trace::init_tracing_subscriber();

	let state = State {
		database: Database::connect(
			&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
		)
		.await
		.expect("failed to connect to database"),
		hasher: Argon2::default(),
	};

	sqlx::migrate!()
		.run(&state.database)
		.await
		.expect("failed to run migrations");

	let default_limit = ratelimit::default();
	let secure_limit = ratelimit::secure();

	ratelimit::cleanup_old_limits(&[&default_limit, &secure_limit]);

	let app = app(state, Some(secure_limit)).layer(GovernorLayer {
		config: default_limit,
	});

	let port = std::env::var("PORT").map_or_else(
		|_| 3000,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {port}");

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
	)
	.await
	.unwrap();
}
