/// Lazily reads a setting from an environment variable.
///
/// The variable is parsed into `$t` on first access. A missing or unparsable
/// value yields `$default`.
#[macro_export]
macro_rules! lazy_env_parse {
	($key:expr_2021, $t:ty, $default:expr_2021) => {
		std::sync::LazyLock::new(|| match std::env::var($key) {
			Ok(s) => s.trim().parse::<$t>().unwrap_or_else(|_| {
				warn!("Ignoring invalid value '{s}' for environment variable {}", $key);
				$default
			}),
			Err(_) => $default,
		})
	};
}

/// Throws an unreachable error with location details
macro_rules! fail {
	($($arg:tt)+) => {
		return Err($crate::err::Error::unreachable(format_args!($($arg)*)))
	};
}

#[cfg(test)]
mod test {
	use std::sync::LazyLock;

	use crate::err::Error;

	fn fail_func() -> Result<(), Error> {
		fail!("Reached unreachable code");
	}

	fn fail_func_args() -> Result<(), Error> {
		fail!("Found {} but expected {}", "test", "other");
	}

	#[test]
	fn fail_literal() {
		let Err(Error::Unreachable(msg)) = fail_func() else {
			panic!()
		};
		assert!(msg.ends_with("Reached unreachable code"));
	}

	#[test]
	fn fail_arguments() {
		let Err(Error::Unreachable(msg)) = fail_func_args() else {
			panic!()
		};
		assert!(msg.ends_with("Found test but expected other"));
	}

	#[test]
	fn env_parse_falls_back_to_default() {
		static LIMIT: LazyLock<usize> =
			lazy_env_parse!("COMPLETER_TEST_UNSET_VARIABLE_FOR_MACRO", usize, 42);
		assert_eq!(*LIMIT, 42);
	}
}
