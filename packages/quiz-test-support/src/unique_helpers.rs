//! Unique test data built from ULIDs so tests never collide on unique columns.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use quiz_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("player");
/// let b = unique_str("player");
/// assert_ne!(a, b);
/// assert!(a.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Unique nickname, short enough to stay readable in logs.
pub fn unique_nickname(prefix: &str) -> String {
    let ulid = Ulid::new().to_string();
    format!("{}_{}", prefix, &ulid[ulid.len() - 10..])
}

/// `{prefix}-{ulid}@example.test`
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}
