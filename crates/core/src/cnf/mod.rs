use std::sync::LazyLock;

/// The namespace used when an operation does not specify one
pub const DEFAULT_NAMESPACE: &str = "items";

/// The document field which holds the text to complete against
pub const DEFAULT_COMPLETION_FIELD: &str = "name";

/// The document field which holds the document identifier
pub const DEFAULT_ID_FIELD: &str = "id";

/// Separator between the words of a compound key or a sort key
pub const WORD_SEPARATOR: char = '|';

/// Separator between the segments of a store key, and between the sort key and id of a member
pub const KEY_SEPARATOR: char = ':';

/// The number of results returned by a search when no limit is given (defaults to 20)
pub static SEARCH_LIMIT: LazyLock<usize> = lazy_env_parse!("COMPLETER_SEARCH_LIMIT", usize, 20);

/// The number of store operations a single call keeps in flight at once (defaults to 64)
pub static MAX_CONCURRENCY: LazyLock<usize> =
	lazy_env_parse!("COMPLETER_MAX_CONCURRENCY", usize, 64);

/// The capacity of the lifecycle notification channel (defaults to 64)
pub static NOTIFICATION_CAPACITY: LazyLock<usize> =
	lazy_env_parse!("COMPLETER_NOTIFICATION_CAPACITY", usize, 64);
