use std::borrow::Cow;

use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json, session};

pub const SECURITY_SCHEME_SESSION: &str = "Session";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const RECIPE: &str = "Recipe";
	pub const ARTICLE: &str = "Article";
	pub const CONTACT: &str = "Contact";
	pub const TODDLER: &str = "Toddler";
	pub const ADMIN: &str = "Admin";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Munchkin Open API")
		.summary("Toddler recipes and child-health articles")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::AUTH.into(),
			description: Some("User authentication".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::RECIPE.into(),
			description: Some("Recipes, favorites and reviews".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::ARTICLE.into(),
			description: Some("Child-health articles, likes and comments".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::CONTACT.into(),
			description: Some("Contact messages".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::TODDLER.into(),
			description: Some("Child profiles".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::ADMIN.into(),
			description: Some("Administrative tables".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("A user session cookie".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::Message<'static>>, _>(|res| {
			res.example(error::Message {
				content: "error message".into(),
				field: Some("optional field".into()),
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("key".into(), serde_json::json!("value"));
					map
				})),
			})
		})
}
