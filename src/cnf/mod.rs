/// The publicly visible name of the binary
pub const PKG_NAME: &str = "completer";

pub const INFO: &str = "\
Prefix and substring autocomplete over a sorted-set key-value store.

Documents are read as JSON, and every command prints its result as JSON on
standard output. Logs are written to standard error.";

/// The datastore used when no path is given
pub const DEFAULT_PATH: &str = "memory";

/// The log filter used when none is given
pub const DEFAULT_LOG: &str = "warn";

/// The value of an input path which reads from standard input
pub const STDIN_PATH: &str = "-";
