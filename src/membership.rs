// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use lyskom_wire::{ArgWriter, Decode, Encode, Reader, WireResult};

use crate::flags::MembershipType;
use crate::ids::ConfNo;
use crate::time::Time;

/// The protocol-10 membership shape: a flat `read_texts` list of local text
/// numbers, superseded in protocol 11 by [`Membership11`]'s `read_ranges`.
/// Kept as a distinct type rather than silently upgraded, so a caller
/// talking to an old server can tell which shape it actually got.
#[derive(Debug, Clone)]
pub struct Membership10 {
	pub position: i32,
	pub last_time_read: Time,
	pub conference: ConfNo,
	pub priority: i32,
	pub last_text_read: i32,
	pub read_texts: Vec<i32>,
	pub added_by: i32,
	pub added_at: Time,
	pub kind: MembershipType,
}

impl Decode for Membership10 {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(Membership10 {
			position: r.read_int()?,
			last_time_read: Time::decode(r)?,
			conference: ConfNo::decode(r)?,
			priority: r.read_int()?,
			last_text_read: r.read_int()?,
			read_texts: Vec::decode(r)?,
			added_by: r.read_int()?,
			added_at: Time::decode(r)?,
			kind: MembershipType::decode(r)?,
		})
	}
}

/// One contiguous range of read local text numbers, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRange {
	pub first_read: i32,
	pub last_read: i32,
}

impl Decode for ReadRange {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(ReadRange { first_read: r.read_int()?, last_read: r.read_int()? })
	}
}

impl Encode for ReadRange {
	fn encode(&self, w: &mut ArgWriter) {
		w.int(self.first_read).int(self.last_read);
	}
}

/// The protocol-11 membership shape, returned by `query-read-texts`
/// (opcode 107) and friends. `read_ranges` replaces protocol 10's flat
/// `read_texts` list; unread-text computation walks it directly.
#[derive(Debug, Clone)]
pub struct Membership11 {
	pub position: i32,
	pub last_time_read: Time,
	pub conference: ConfNo,
	pub priority: i32,
	pub read_ranges: Vec<ReadRange>,
	pub added_by: i32,
	pub added_at: Time,
	pub kind: MembershipType,
}

impl Decode for Membership11 {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(Membership11 {
			position: r.read_int()?,
			last_time_read: Time::decode(r)?,
			conference: ConfNo::decode(r)?,
			priority: r.read_int()?,
			read_ranges: r.read_array(ReadRange::decode)?,
			added_by: r.read_int()?,
			added_at: Time::decode(r)?,
			kind: MembershipType::decode(r)?,
		})
	}
}

/// A single member entry as returned by `get-members` (opcode 101): the
/// membership viewed from the conference's side rather than the person's.
#[derive(Debug, Clone)]
pub struct Member {
	pub member: i32,
	pub added_by: i32,
	pub added_at: Time,
	pub kind: MembershipType,
}

impl Decode for Member {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(Member {
			member: r.read_int()?,
			added_by: r.read_int()?,
			added_at: Time::decode(r)?,
			kind: MembershipType::decode(r)?,
		})
	}
}
