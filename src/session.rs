use uuid::Uuid;

pub const COOKIE_NAME: &str = "session";

/// Creates a session cookie with no expiry
pub fn create_cookie(session_id: Uuid) -> cookie::Cookie<'static> {
	cookie::Cookie::build((COOKIE_NAME, session_id.to_string()))
		.secure(cfg!(debug_assertions))
		.http_only(cfg!(debug_assertions))
		.path("/")
		.into()
}

/// Creates an empty session cookie used to invalidate a previous one
pub fn clear_cookie() -> cookie::Cookie<'static> {
	cookie::Cookie::build(COOKIE_NAME)
		.http_only(cfg!(debug_assertions))
		.path("/")
		.max_age(cookie::time::Duration::ZERO)
		.into()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_clear_cookie_expires_immediately() {
		let cookie = clear_cookie();

		assert_eq!(cookie.max_age(), Some(cookie::time::Duration::ZERO));
	}

	#[test]
	fn test_create_cookie_carries_session_id() {
		let id = Uuid::new_v4();
		let cookie = create_cookie(id);

		assert_eq!(cookie.name(), COOKIE_NAME);
		assert_eq!(cookie.value(), id.to_string());
	}
}
