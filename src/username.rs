use std::collections::{BTreeSet, HashMap};

use crate::Database;

/// Resolves the display names for a set of review or comment authors in one
/// batched query.
///
/// Duplicate ids are deduplicated before the lookup, and an empty input
/// returns an empty map without touching the database. Callers that render
/// lists treat a failed resolve as an empty map so the list itself still
/// serves, with author names blank.
pub async fn resolve(
	database: &Database,
	ids: impl IntoIterator<Item = i32>,
) -> sqlx::Result<HashMap<i32, String>> {
	let ids = ids.into_iter().collect::<BTreeSet<_>>();

	if ids.is_empty() {
		return Ok(HashMap::new());
	}

	let rows = sqlx::query_as::<_, (i32, String)>(
		r#"
			SELECT id, username FROM users WHERE id = ANY($1)
		"#,
	)
	.bind(ids.into_iter().collect::<Vec<_>>())
	.fetch_all(database)
	.await?;

	Ok(rows.into_iter().collect())
}

/// Resolves author names for a list of posts, logging and discarding the
/// error on failure.
pub async fn resolve_or_empty(
	database: &Database,
	ids: impl IntoIterator<Item = i32>,
) -> HashMap<i32, String> {
	match resolve(database, ids).await {
		Ok(map) => map,
		Err(error) => {
			tracing::error!(%error, "failed to resolve usernames");
			HashMap::new()
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_resolve_empty_input_makes_no_query(pool: Database) {
		// A closed pool would fail any query; an empty input must not issue one.
		pool.close().await;

		let map = super::resolve(&pool, []).await.unwrap();

		assert!(map.is_empty());
	}

	#[sqlx::test]
	async fn test_resolve_deduplicates_and_maps(pool: Database) {
		let alice = seed_user(&pool, "alice", "alice@example.com").await;
		let bob = seed_user(&pool, "bob", "bob@example.com").await;

		let map = super::resolve(&pool, [alice, bob, alice, alice])
			.await
			.unwrap();

		assert_eq!(map.len(), 2);
		assert_eq!(map[&alice], "alice");
		assert_eq!(map[&bob], "bob");
	}
}
