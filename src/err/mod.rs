use thiserror::Error;

/// An error raised by the command line interface.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The completion engine or its datastore failed
	#[error(transparent)]
	Core(#[from] completer_core::err::Error),

	/// The log filter could not be parsed
	#[error("Invalid log filter '{filter}': {message}")]
	LogFilter {
		filter: String,
		message: String,
	},

	/// Input could not be read
	#[error("Unable to read input: {0}")]
	Io(#[from] std::io::Error),

	/// Input was not valid JSON for the requested operation
	#[error("Unable to parse input: {0}")]
	Json(#[from] serde_json::Error),
}
