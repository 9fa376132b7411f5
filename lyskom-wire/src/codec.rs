// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use crate::error::WireResult;
use crate::reader::Reader;
use crate::writer::ArgWriter;

/// Something that can be read off the wire by composing the primitives on
/// [`Reader`]. The generic parameter is carried on the method, not the
/// trait, since every implementor needs to work over whatever stream type
/// the caller's `Reader` happens to be instantiated with.
pub trait Decode: Sized {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self>;
}

/// Something that can be appended to an outgoing request's argument list.
pub trait Encode {
	fn encode(&self, w: &mut ArgWriter);
}

impl Decode for i32 {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		r.read_int()
	}
}

impl Encode for i32 {
	fn encode(&self, w: &mut ArgWriter) {
		w.int(*self);
	}
}

impl Decode for f64 {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		r.read_float()
	}
}

/// Decodes a Hollerith string as ISO-8859-1 text. LysKOM's wire charset
/// maps byte-for-byte onto the first 256 Unicode code points, so this never
/// fails the way a UTF-8 decode could.
impl Decode for String {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(latin1_to_string(&r.read_hollerith()?))
	}
}

impl Encode for str {
	fn encode(&self, w: &mut ArgWriter) {
		w.hollerith(&string_to_latin1(self));
	}
}

impl Encode for String {
	fn encode(&self, w: &mut ArgWriter) {
		w.hollerith(&string_to_latin1(self));
	}
}

impl<T: Decode> Decode for Vec<T> {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		r.read_array(|r| T::decode(r))
	}
}

impl<T: Encode> Encode for [T] {
	fn encode(&self, w: &mut ArgWriter) {
		w.array(self, |w, item| item.encode(w));
	}
}

impl<T: Encode> Encode for Vec<T> {
	fn encode(&self, w: &mut ArgWriter) {
		self.as_slice().encode(w);
	}
}

/// Maps each byte to the Unicode code point of the same value, which is
/// exactly what ISO-8859-1 is.
pub fn latin1_to_string(bytes: &[u8]) -> String {
	bytes.iter().map(|&b| b as char).collect()
}

/// Inverse of [`latin1_to_string`]; characters outside the Latin-1 range
/// are replaced with `?`, matching the lossy round-trip a LysKOM server
/// itself performs for out-of-repertoire input.
pub fn string_to_latin1(s: &str) -> Vec<u8> {
	s.chars().map(|c| if (c as u32) < 256 { c as u8 } else { b'?' }).collect()
}
