//! Derives the completion entries written for a document.
//!
//! Every word of the completion text is indexed under each of its prefixes,
//! scored by the 1-based position of the word. Inner substrings of a word
//! (every suffix starting after the first character and spanning at least two
//! characters) are indexed too, scored after every positional match.
use std::collections::BTreeMap;

use serde_json::Value;

use crate::cnf::WORD_SEPARATOR;
use crate::doc::Fields;
use crate::idx::analyzer::{normalize, words};

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
	pub term: String,
	pub score: f64,
}

/// Derive the entries for the normalized words of a document, in term order.
///
/// A term reachable in several ways is written once, with its best score.
pub fn entries(words: &[String]) -> Vec<Entry> {
	let inner = (words.len() + 1) as f64;
	let mut out: BTreeMap<&str, f64> = BTreeMap::new();
	let mut put = |term, score: f64| {
		out.entry(term).and_modify(|e: &mut f64| *e = e.min(score)).or_insert(score);
	};
	for (i, word) in words.iter().enumerate() {
		let score = (i + 1) as f64;
		let len = word.len();
		for k in 1..=len {
			put(&word[..k], score);
		}
		for k in 1..len.saturating_sub(1) {
			put(&word[k..], inner);
		}
	}
	out.into_iter()
		.map(|(term, score)| Entry {
			term: term.to_owned(),
			score,
		})
		.collect()
}

/// Compute the sort key of a document.
///
/// The sort field is used when the document holds it: strings are normalized
/// and their words joined, numbers are rendered as they are. Otherwise the
/// words of the completion text are joined.
pub fn sort_key(fields: &Fields, sort_field: &str, text: &[String]) -> String {
	let joined = |w: &[String]| w.join(&WORD_SEPARATOR.to_string());
	match fields.get(sort_field) {
		None | Some(Value::Null) => joined(text),
		Some(Value::Number(n)) => n.to_string(),
		Some(Value::String(s)) => {
			let w = words(&normalize(s.as_str()));
			if w.is_empty() {
				joined(text)
			} else {
				joined(&w)
			}
		}
		Some(v) => {
			let w = words(&normalize(v.to_string().as_str()));
			joined(&w)
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn w(v: &[&str]) -> Vec<String> {
		v.iter().map(|s| s.to_string()).collect()
	}

	fn find<'a>(e: &'a [Entry], term: &str) -> Option<&'a Entry> {
		e.iter().find(|e| e.term == term)
	}

	#[test]
	fn prefixes_score_by_position() {
		let e = entries(&w(&["grant", "tom"]));
		for t in ["g", "gr", "gra", "gran", "grant"] {
			assert_eq!(find(&e, t).unwrap().score, 1.0, "{t}");
		}
		for t in ["t", "to", "tom"] {
			assert_eq!(find(&e, t).unwrap().score, 2.0, "{t}");
		}
	}

	#[test]
	fn inner_suffixes_score_after_positions() {
		let e = entries(&w(&["grant", "tom"]));
		for t in ["rant", "ant", "nt"] {
			assert_eq!(find(&e, t).unwrap().score, 3.0, "{t}");
		}
		// Single character suffixes are not indexed
		assert!(find(&e, "m").is_none());
		// "om" is the only inner suffix of "tom"
		assert_eq!(find(&e, "om").unwrap().score, 3.0);
	}

	#[test]
	fn best_score_wins() {
		// "ob" is inner to "bob" and a prefix of "oboe"
		let e = entries(&w(&["bob", "oboe"]));
		assert_eq!(find(&e, "ob").unwrap().score, 2.0);
		// Repeated words keep their first position
		let e = entries(&w(&["tom", "tom"]));
		assert_eq!(find(&e, "tom").unwrap().score, 1.0);
		assert_eq!(e.iter().filter(|e| e.term == "tom").count(), 1);
	}

	#[test]
	fn short_words() {
		let e = entries(&w(&["a", "bc"]));
		let terms: Vec<&str> = e.iter().map(|e| e.term.as_str()).collect();
		assert_eq!(terms, vec!["a", "b", "bc"]);
		assert!(entries(&[]).is_empty());
	}

	#[test]
	fn sort_keys() {
		let words = w(&["bob", "smith"]);
		let doc = json!({"name": "Bob Smith", "priority": 1, "title": "Señor X", "pinned": true});
		let Value::Object(doc) = doc else {
			unreachable!()
		};
		assert_eq!(sort_key(&doc, "name", &words), "bob|smith");
		assert_eq!(sort_key(&doc, "missing", &words), "bob|smith");
		assert_eq!(sort_key(&doc, "priority", &words), "1");
		assert_eq!(sort_key(&doc, "title", &words), "senor|x");
		assert_eq!(sort_key(&doc, "pinned", &words), "true");
	}
}
