// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use bitflags::bitflags;
use lyskom_wire::{ArgWriter, Decode, Encode, Reader, WireResult};

/// Turns a bitstring, most-significant (first-read) flag first, into the
/// matching `bitflags!` bit pattern.
fn bits_to_mask(bits: &[bool]) -> u32 {
	let mut mask = 0u32;
	for (i, &b) in bits.iter().enumerate() {
		if b {
			mask |= 1 << i;
		}
	}
	mask
}

fn mask_to_bits(mask: u32, n: usize) -> Vec<bool> {
	(0..n).map(|i| mask & (1 << i) != 0).collect()
}

bitflags! {
	/// Conference kind bits. The wire width is 4 bits on servers still
	/// using the pre-extended `ConfType` (`old_format`, see
	/// [`ConfType::decode_with_width`]) and 8 bits otherwise.
	pub struct ConfType: u32 {
		const RD_PROT          = 1 << 0;
		const ORIGINAL         = 1 << 1;
		const SECRET           = 1 << 2;
		const LETTERBOX        = 1 << 3;
		const ALLOW_ANONYMOUS  = 1 << 4;
		const FORBID_SECRET    = 1 << 5;
		const RESERVED1        = 1 << 6;
		const RESERVED2        = 1 << 7;
	}
}

impl ConfType {
	/// Old (protocol-10-era) servers send a 4-bit `ConfType`; the high four
	/// flags never existed on the wire and decode as unset.
	pub fn decode_with_width<R: Read>(r: &mut Reader<R>, old_format: bool) -> WireResult<Self> {
		let width = if old_format { 4 } else { 8 };
		Ok(ConfType::from_bits_truncate(bits_to_mask(&r.read_bitstring(width)?)))
	}

	pub fn encode_with_width(&self, w: &mut ArgWriter, old_format: bool) {
		let width = if old_format { 4 } else { 8 };
		w.bitstring(&mask_to_bits(self.bits(), width));
	}
}

impl Decode for ConfType {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Self::decode_with_width(r, false)
	}
}

impl Encode for ConfType {
	fn encode(&self, w: &mut ArgWriter) {
		self.encode_with_width(w, false);
	}
}

bitflags! {
	/// Per-person server privileges.
	pub struct PrivBits: u32 {
		const WHEEL        = 1 << 0;
		const ADMIN        = 1 << 1;
		const STATISTIC    = 1 << 2;
		const CREATE_PERS  = 1 << 3;
		const CREATE_CONF  = 1 << 4;
		const CHANGE_NAME  = 1 << 5;
		// bits 6-15 are reserved for future privileges.
	}
}

impl Decode for PrivBits {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(PrivBits::from_bits_truncate(bits_to_mask(&r.read_bitstring(16)?)))
	}
}

impl Encode for PrivBits {
	fn encode(&self, w: &mut ArgWriter) {
		w.bitstring(&mask_to_bits(self.bits(), 16));
	}
}

bitflags! {
	pub struct PersonalFlags: u32 {
		const UNREAD_IS_SECRET = 1 << 0;
		const FLG2 = 1 << 1;
		const FLG3 = 1 << 2;
		const FLG4 = 1 << 3;
		const FLG5 = 1 << 4;
		const FLG6 = 1 << 5;
		const FLG7 = 1 << 6;
		const FLG8 = 1 << 7;
	}
}

impl Decode for PersonalFlags {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(PersonalFlags::from_bits_truncate(bits_to_mask(&r.read_bitstring(8)?)))
	}
}

impl Encode for PersonalFlags {
	fn encode(&self, w: &mut ArgWriter) {
		w.bitstring(&mask_to_bits(self.bits(), 8));
	}
}

bitflags! {
	pub struct SessionFlags: u32 {
		const INVISIBLE         = 1 << 0;
		const USER_ACTIVE_USED  = 1 << 1;
		const USER_ABSENT       = 1 << 2;
		const RECONNECTED       = 1 << 3;
		const FLG5 = 1 << 4;
		const FLG6 = 1 << 5;
		const FLG7 = 1 << 6;
		const FLG8 = 1 << 7;
	}
}

impl Decode for SessionFlags {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(SessionFlags::from_bits_truncate(bits_to_mask(&r.read_bitstring(8)?)))
	}
}

impl Encode for SessionFlags {
	fn encode(&self, w: &mut ArgWriter) {
		w.bitstring(&mask_to_bits(self.bits(), 8));
	}
}

bitflags! {
	pub struct MembershipType: u32 {
		const INVITATION              = 1 << 0;
		const PASSIVE                 = 1 << 1;
		const SECRET                  = 1 << 2;
		const PASSIVE_MESSAGE_INVERT  = 1 << 3;
		const FLG5 = 1 << 4;
		const FLG6 = 1 << 5;
		const FLG7 = 1 << 6;
		const FLG8 = 1 << 7;
	}
}

impl Decode for MembershipType {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(MembershipType::from_bits_truncate(bits_to_mask(&r.read_bitstring(8)?)))
	}
}

impl Encode for MembershipType {
	fn encode(&self, w: &mut ArgWriter) {
		w.bitstring(&mask_to_bits(self.bits(), 8));
	}
}

bitflags! {
	pub struct AuxItemFlags: u32 {
		const DELETED       = 1 << 0;
		const INHERIT       = 1 << 1;
		const SECRET        = 1 << 2;
		const HIDE_CREATOR  = 1 << 3;
		const DONT_GARB     = 1 << 4;
		const FLG6 = 1 << 5;
		const FLG7 = 1 << 6;
		const FLG8 = 1 << 7;
	}
}

impl Decode for AuxItemFlags {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(AuxItemFlags::from_bits_truncate(bits_to_mask(&r.read_bitstring(8)?)))
	}
}

impl Encode for AuxItemFlags {
	fn encode(&self, w: &mut ArgWriter) {
		w.bitstring(&mask_to_bits(self.bits(), 8));
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use lyskom_wire::Reader;

	use super::*;

	fn reader_over(s: &str) -> Reader<Cursor<Vec<u8>>> {
		Reader::new(Cursor::new(s.as_bytes().to_vec()))
	}

	#[test]
	fn conf_type_decodes_declared_flag_count() {
		let mut r = reader_over("01001000");
		let ct = ConfType::decode(&mut r).unwrap();
		assert!(ct.contains(ConfType::ORIGINAL));
		assert!(ct.contains(ConfType::ALLOW_ANONYMOUS));
		assert!(!ct.contains(ConfType::RD_PROT));
		assert!(!ct.contains(ConfType::SECRET));
	}

	#[test]
	fn conf_type_old_format_only_reads_four_bits() {
		// Old-format servers only ever send 4 bits; the upper 4 flags
		// this client knows about must decode unset, not misread from
		// whatever bytes happen to follow on the wire.
		let mut r = reader_over("1010 9999");
		let ct = ConfType::decode_with_width(&mut r, true).unwrap();
		assert!(ct.contains(ConfType::RD_PROT));
		assert!(ct.contains(ConfType::SECRET));
		assert!(!ct.contains(ConfType::ALLOW_ANONYMOUS));
		// the next int on the wire is untouched by the 4-bit read
		assert_eq!(r.read_int().unwrap(), 9999);
	}

	#[test]
	fn priv_bits_round_trips_through_encode_and_decode() {
		let bits = PrivBits::WHEEL | PrivBits::CREATE_CONF;
		let mut w = ArgWriter::new();
		bits.encode(&mut w);
		let encoded = w.into_bytes();
		assert_eq!(encoded.len(), 16, "a 16-flag bitstring must emit exactly 16 chars");

		let mut r = Reader::new(Cursor::new(encoded));
		let decoded = PrivBits::decode(&mut r).unwrap();
		assert_eq!(decoded, bits);
	}

	#[test]
	fn membership_type_round_trips() {
		let kind = MembershipType::PASSIVE | MembershipType::SECRET;
		let mut w = ArgWriter::new();
		kind.encode(&mut w);
		let mut r = Reader::new(Cursor::new(w.into_bytes()));
		assert_eq!(MembershipType::decode(&mut r).unwrap(), kind);
	}
}
