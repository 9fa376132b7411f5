// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turning a membership's read ranges into the list of globally-numbered
//! unread texts in a conference.

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::ids::{ConfNo, PersNo};
use crate::membership::ReadRange;
use crate::request::{ReqLocalToGlobal, ReqQueryReadTexts};

/// Local-to-global lookups are capped at 255 texts per call; a run longer
/// than that is split into several requests.
const MAX_TEXTS_PER_CALL: i32 = 255;

/// Whether `local_no` falls inside one of `ranges`.
pub fn text_in_read_ranges(local_no: i32, ranges: &[ReadRange]) -> bool {
	ranges.iter().any(|r| local_no >= r.first_read && local_no <= r.last_read)
}

/// Collapses a membership's read ranges into the interior gaps between them
/// (as `(first_unread_local_no, gap_length)` pairs) plus the cursor one past
/// the last read range. Unlike [`text_in_read_ranges`], this assumes the
/// ranges are already in ascending order, which is how the server sends
/// them.
pub fn read_ranges_to_gaps_and_last(ranges: &[ReadRange]) -> (Vec<(i32, i32)>, i32) {
	let mut gaps = Vec::new();
	let mut last = 1;
	for r in ranges {
		let gap_len = r.first_read - last - 1;
		if gap_len > 0 {
			gaps.push((last, gap_len));
		}
		last = r.last_read + 1;
	}
	(gaps, last)
}

/// The global text numbers of every unread text in `conf_no` for
/// `person_no`, found by walking forward from the last read range's end via
/// `local-to-global`, in chunks of at most 255, filtering out local numbers
/// `text_in_read_ranges` already covers. Stops cleanly on
/// `no-such-local-text`, the signal that no local text numbers remain to
/// translate.
pub fn get_unread_texts_for_person(conn: &mut Connection, person_no: PersNo, conf_no: ConfNo) -> Result<Vec<i32>> {
	let membership = conn.call(ReqQueryReadTexts::new(person_no, conf_no))?;
	let mut unread = Vec::new();

	let last_text_read = membership.read_ranges.last().map(|r| r.last_read).unwrap_or(0);
	let mut ask_for = last_text_read + 1;
	loop {
		let mapping =
			match conn.call(ReqLocalToGlobal { conf_no, first_local_no: ask_for, no_of_existing_texts: MAX_TEXTS_PER_CALL }) {
				Ok(m) => m,
				Err(Error::Server { code, .. }) if code.is_no_such_local_text() => break,
				Err(e) => return Err(e),
			};
		for (local, global) in mapping.pairs() {
			if !text_in_read_ranges(local, &membership.read_ranges) {
				unread.push(global);
			}
		}
		if !mapping.later_texts_exists {
			break;
		}
		ask_for = mapping.range_end;
	}
	Ok(unread)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn range(first: i32, last: i32) -> ReadRange {
		ReadRange { first_read: first, last_read: last }
	}

	#[test]
	fn text_in_read_ranges_checks_membership() {
		let ranges = [range(1, 5), range(10, 12)];
		assert!(text_in_read_ranges(3, &ranges));
		assert!(text_in_read_ranges(11, &ranges));
		assert!(!text_in_read_ranges(7, &ranges));
	}

	#[test]
	fn no_ranges_leaves_no_gaps_and_last_at_one() {
		let (gaps, last) = read_ranges_to_gaps_and_last(&[]);
		assert!(gaps.is_empty());
		assert_eq!(last, 1);
	}

	#[test]
	fn single_range_from_the_start_leaves_no_leading_gap() {
		let (gaps, last) = read_ranges_to_gaps_and_last(&[range(1, 10)]);
		assert!(gaps.is_empty());
		assert_eq!(last, 11);
	}

	#[test]
	fn interior_and_leading_gaps_are_both_found() {
		let (gaps, last) = read_ranges_to_gaps_and_last(&[range(5, 10), range(20, 25)]);
		assert_eq!(gaps, vec![(1, 3), (11, 8)]);
		assert_eq!(last, 26);
	}
}
