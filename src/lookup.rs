// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Name and regular-expression lookup, including the collate-table
//! rewriting that makes a regex search case-insensitive server-side.

use crate::cache::CachedConnection;
use crate::error::{Error, ErrorCode, Result};
use crate::flags::ConfType;
use crate::request::{ReqGetCollateTable, ReqLookupZName, ReqReZLookup};

/// Resolves `name` to `(conf_no, name)` pairs. A leading `#` is treated as a
/// literal conference/person number rather than a name: the rest of the
/// string is parsed as an integer and looked up directly via the uconference
/// cache, bypassing the server's name index entirely. Otherwise issues
/// `lookup-z-name`.
pub fn lookup_name(conn: &mut CachedConnection, name: &str, want_pers: bool, want_confs: bool) -> Result<Vec<(i32, String)>> {
	if let Some(digits) = name.strip_prefix('#') {
		let no: i32 = match digits.parse() {
			Ok(no) => no,
			Err(_) => return Ok(Vec::new()),
		};
		let uconf = match conn.uconference(no) {
			Ok(u) => u,
			Err(Error::Server { code: ErrorCode::UndefinedConference, .. }) => return Ok(Vec::new()),
			Err(e) => return Err(e),
		};
		let is_letterbox = uconf.kind.contains(ConfType::LETTERBOX);
		let wants_this = if is_letterbox { want_pers } else { want_confs };
		return Ok(if wants_this { vec![(no, uconf.name)] } else { Vec::new() });
	}

	let matches = conn.connection_mut().call(ReqLookupZName {
		name: name.to_string(),
		want_pers: want_pers as i32,
		want_confs: want_confs as i32,
	})?;
	Ok(matches.into_iter().map(|m| (m.conf_no.0, m.name)).collect())
}

/// Resolves `pattern` as a regular expression to `(conf_no, name)` pairs via
/// `re-z-lookup`. A leading `#` is delegated straight to [`lookup_name`].
/// Unless `case_sensitive`, the pattern is rewritten first so that every
/// character outside a `[...]` class is replaced by a class of every byte
/// the server's collate table treats as equivalent.
pub fn regexp_lookup(
	conn: &mut CachedConnection,
	pattern: &str,
	want_pers: bool,
	want_confs: bool,
	case_sensitive: bool,
) -> Result<Vec<(i32, String)>> {
	if pattern.starts_with('#') {
		return lookup_name(conn, pattern, want_pers, want_confs);
	}

	let wire_pattern = if case_sensitive {
		pattern.to_string()
	} else {
		// TODO: cache the collate table instead of refetching it on every
		// case-insensitive lookup; it only changes when the server restarts
		// with a different locale.
		let collate_table = conn.connection_mut().call(ReqGetCollateTable)?;
		case_insensitive_pattern(pattern, &collate_table)
	};

	let matches = conn.connection_mut().call(ReqReZLookup {
		regexp: wire_pattern,
		want_pers: want_pers as i32,
		want_confs: want_confs as i32,
	})?;
	Ok(matches.into_iter().map(|m| (m.conf_no.0, m.name)).collect())
}

/// Rewrites `pattern` so every character outside a `[...]` class becomes a
/// class of its collate-table equivalents. Bracket expressions are copied
/// verbatim; both the opening `[` and closing `]` themselves are emitted
/// through the same substitution path as everything else, which is a no-op
/// for them since a bracket is its own sole collate-table equivalent.
fn case_insensitive_pattern(pattern: &str, collate_table: &[u8]) -> String {
	let mut result = String::new();
	let mut inside_brackets = false;
	for c in pattern.chars() {
		if c == '[' {
			inside_brackets = true;
		}

		if inside_brackets {
			result.push(c);
		} else {
			let eqv = equivalent_chars(c, collate_table);
			if eqv.chars().count() > 1 {
				result.push('[');
				result.push_str(&eqv);
				result.push(']');
			} else {
				result.push_str(&eqv);
			}
		}

		if c == ']' {
			inside_brackets = false;
		}
	}
	result
}

/// Every character the collate table normalizes to the same byte as `c`, in
/// ascending byte order. Characters outside the table's range (non-Latin-1)
/// are returned unchanged, since the table has nothing to say about them.
fn equivalent_chars(c: char, collate_table: &[u8]) -> String {
	let Ok(c_byte) = u8::try_from(c as u32) else {
		return c.to_string();
	};
	let Some(&norm) = collate_table.get(c_byte as usize) else {
		return c.to_string();
	};
	collate_table
		.iter()
		.enumerate()
		.filter(|&(_, &b)| b == norm)
		.map(|(i, _)| i as u8 as char)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use regex::Regex;

	/// An identity table except that `a`/`A` and `e`/`E`/`\xe9` (`é`) all
	/// normalize to the same byte, enough to exercise the substitution
	/// without a full 256-entry fixture.
	fn sample_collate_table() -> Vec<u8> {
		let mut table: Vec<u8> = (0u16..256).map(|i| i as u8).collect();
		table[b'A' as usize] = b'a';
		table[b'a' as usize] = b'a';
		table[b'E' as usize] = b'e';
		table[b'e' as usize] = b'e';
		table[0xE9] = b'e'; // 'é'
		table
	}

	#[test]
	fn bracket_expressions_are_left_untouched() {
		let table = sample_collate_table();
		assert_eq!(case_insensitive_pattern("[0-9]", &table), "[0-9]");
		assert_eq!(case_insensitive_pattern("^a[0-9]+$", &table), "^[Aa][0-9]+$");
	}

	#[test]
	fn equivalence_classes_cover_every_collated_byte() {
		let table = sample_collate_table();
		let rewritten = case_insensitive_pattern("cafe", &table);
		assert_eq!(rewritten, "c[Aa]f[Ee\u{e9}]");
	}

	#[test]
	fn degenerate_classes_are_not_bracketed() {
		let table = sample_collate_table();
		assert_eq!(case_insensitive_pattern("xyz", &table), "xyz");
	}

	#[test]
	fn rewritten_pattern_matches_every_equivalent_byte() {
		let table = sample_collate_table();
		let rewritten = case_insensitive_pattern("^cafe$", &table);
		let re = Regex::new(&rewritten).unwrap();
		assert!(re.is_match("cafe"));
		assert!(re.is_match("CAFE"));
		assert!(re.is_match("Cafe"));
	}
}
