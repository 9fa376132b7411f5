// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use thiserror::Error;

/// Something went wrong while decoding or encoding one of the wire-level
/// atoms: integers, floats, Hollerith strings, bitstrings, and arrays.
///
/// This is the failure type of [`lyskom-wire`](crate); it says nothing about
/// LysKOM records or requests, only about the byte-level grammar itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WireError {
	/// A character was encountered where the grammar required a different
	/// one (a Hollerith length not followed by `H`, a bitstring digit that
	/// was neither `0` nor `1`, an array not opened with `{` or `*`, ...).
	#[error("unexpected character {found:?}, expected {expected}")]
	UnexpectedChar { found: char, expected: &'static str },

	/// The stream ended, or the underlying socket returned zero bytes, while
	/// more input was still required to complete an atom.
	#[error("connection closed while reading")]
	Eof,

	/// A lower-level I/O failure from the underlying reader or writer.
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	/// A float's digit run could not be parsed as a floating point number.
	#[error("invalid float literal: {0:?}")]
	InvalidFloat(String),

	/// An integer's digit run could not be parsed as an `i32` (for example,
	/// a magnitude that overflows it).
	#[error("invalid integer literal: {0:?}")]
	InvalidInt(String),
}

pub type WireResult<T> = Result<T, WireError>;
