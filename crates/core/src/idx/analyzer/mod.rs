//! Reduces text to the completion terms stored in the index.
//!
//! Both indexed text and search queries pass through [`normalize`], so a
//! query matches whenever its terms are prefixes (or inner substrings) of the
//! normalized words of a document.

/// Normalize a piece of text into a completion term.
///
/// The text is folded to ASCII (`ñ` becomes `n`) and lowercased. The
/// separators `_`, `-` and `+` become spaces, every other character which is
/// not alphanumeric is removed, and runs of whitespace collapse into a single
/// space. A missing input normalizes to an empty string.
pub fn normalize<'a>(text: impl Into<Option<&'a str>>) -> String {
	let Some(text) = text.into() else {
		return String::new();
	};
	let folded = deunicode::deunicode(text);
	let mut out = String::with_capacity(folded.len());
	let mut space = false;
	for c in folded.chars() {
		let c = match c {
			'_' | '-' | '+' => ' ',
			c => c,
		};
		if c.is_whitespace() {
			space = !out.is_empty();
		} else if c.is_ascii_alphanumeric() {
			if space {
				out.push(' ');
				space = false;
			}
			out.push(c.to_ascii_lowercase());
		}
	}
	out
}

/// Split a normalized string into its words
pub fn words(text: &str) -> Vec<String> {
	text.split_whitespace().map(ToOwned::to_owned).collect()
}
