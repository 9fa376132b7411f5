// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Byte-level grammar for LysKOM Protocol A: integers, floats, Hollerith
//! strings, bitstrings and arrays, plus the growing-buffer reader and
//! line-oriented writer that sit under a live connection.
//!
//! Nothing in this crate knows what a conference or a text is; that's
//! `lyskom`'s job. This crate only knows how to turn bytes into atoms and
//! atoms into bytes.

mod codec;
mod error;
mod reader;
mod writer;

pub use codec::{latin1_to_string, string_to_latin1, Decode, Encode};
pub use error::{WireError, WireResult};
pub use reader::Reader;
pub use writer::{ArgWriter, Writer};

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;

	fn reader_over(s: &str) -> Reader<Cursor<Vec<u8>>> {
		Reader::new(Cursor::new(s.as_bytes().to_vec()))
	}

	#[test]
	fn reads_positive_and_negative_ints() {
		let mut r = reader_over("42 -17 0\n");
		assert_eq!(r.read_int().unwrap(), 42);
		assert_eq!(r.read_int().unwrap(), -17);
		assert_eq!(r.read_int().unwrap(), 0);
	}

	#[test]
	fn reads_hollerith_string_with_embedded_bytes() {
		let mut r = reader_over("5Hhello 0H");
		let first = String::decode(&mut r).unwrap();
		assert_eq!(first, "hello");
		let second = String::decode(&mut r).unwrap();
		assert_eq!(second, "");
	}

	#[test]
	fn hollerith_length_counts_bytes_not_chars() {
		// A Hollerith length is a byte count: embedded spaces and control
		// bytes inside the payload must not be mistaken for separators.
		let mut r = reader_over("7Hone two");
		let s = String::decode(&mut r).unwrap();
		assert_eq!(s, "one two");
	}

	#[test]
	fn reads_bitstring() {
		let mut r = reader_over("1010");
		assert_eq!(r.read_bitstring(4).unwrap(), vec![true, false, true, false]);
	}

	#[test]
	fn reads_bitstring_after_skipping_leading_whitespace() {
		let mut r = reader_over("  1100");
		assert_eq!(r.read_bitstring(4).unwrap(), vec![true, true, false, false]);
	}

	#[test]
	fn array_opt_out_decodes_empty() {
		let mut r = reader_over("*");
        let v: Vec<i32> = r.read_array(|r| r.read_int()).unwrap();
		assert!(v.is_empty());
	}

	#[test]
	fn array_round_trips_through_encode_and_decode() {
		let mut w = ArgWriter::new();
		let items = vec![1, 2, 3];
		items.encode(&mut w);
		let bytes = w.into_bytes();
		let mut r = Reader::new(Cursor::new(bytes));
		let decoded: Vec<i32> = Vec::decode(&mut r).unwrap();
		assert_eq!(decoded, items);
	}

	#[test]
	fn empty_array_encodes_as_star() {
		let mut w = ArgWriter::new();
		let items: Vec<i32> = Vec::new();
		items.encode(&mut w);
		assert_eq!(w.into_bytes(), b"*");
	}

	#[test]
	fn overflowing_int_is_a_wire_error_not_a_panic() {
		let mut r = reader_over("99999999999 ");
		match r.read_int() {
			Err(WireError::InvalidInt(digits)) => assert_eq!(digits, "99999999999"),
			other => panic!("expected InvalidInt, got {:?}", other),
		}
	}

	#[test]
	fn overflowing_hollerith_length_is_a_wire_error_not_a_panic() {
		let mut r = reader_over("99999999999999999999Hx");
		match String::decode(&mut r) {
			Err(WireError::UnexpectedChar { expected, .. }) => {
				assert_eq!(expected, "a valid Hollerith length")
			}
			other => panic!("expected UnexpectedChar, got {:?}", other),
		}
	}

	#[test]
	fn latin1_round_trip_is_byte_identity_for_low_half() {
		let bytes: Vec<u8> = (0..=255).collect();
		let s = latin1_to_string(&bytes);
		assert_eq!(string_to_latin1(&s), bytes);
	}
}
