// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use lyskom_wire::{Decode, Reader, WireResult};

use crate::aux_item::AuxItem;
use crate::flags::ConfType;
use crate::ids::ConfNo;
use crate::time::Time;

/// The short conference summary returned by `lookup-z-name` (opcode 76):
/// just enough to populate a name-completion list. Uses the old 4-bit
/// `ConfType` encoding regardless of protocol version.
#[derive(Debug, Clone)]
pub struct ConfZInfo {
	pub name: String,
	pub kind: ConfType,
	pub conf_no: ConfNo,
}

impl Decode for ConfZInfo {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(ConfZInfo {
			name: String::decode(r)?,
			kind: ConfType::decode_with_width(r, true)?,
			conf_no: ConfNo::decode(r)?,
		})
	}
}

/// The full conference record returned by `get-conf-stat` (opcode 91).
#[derive(Debug, Clone)]
pub struct Conference {
	pub name: String,
	pub kind: ConfType,
	pub creation_time: Time,
	pub last_written: Time,
	pub creator: i32,
	pub presentation: i32,
	pub supervisor: i32,
	pub permitted_submitters: i32,
	pub super_conf: i32,
	pub msg_of_day: i32,
	pub nice: i32,
	pub keep_commented: i32,
	pub no_of_members: i32,
	pub first_local_no: i32,
	pub no_of_texts: i32,
	pub expire: i32,
	pub aux_items: Vec<AuxItem>,
}

impl Decode for Conference {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(Conference {
			name: String::decode(r)?,
			kind: ConfType::decode(r)?,
			creation_time: Time::decode(r)?,
			last_written: Time::decode(r)?,
			creator: r.read_int()?,
			presentation: r.read_int()?,
			supervisor: r.read_int()?,
			permitted_submitters: r.read_int()?,
			super_conf: r.read_int()?,
			msg_of_day: r.read_int()?,
			nice: r.read_int()?,
			keep_commented: r.read_int()?,
			no_of_members: r.read_int()?,
			first_local_no: r.read_int()?,
			no_of_texts: r.read_int()?,
			expire: r.read_int()?,
			aux_items: r.read_array(AuxItem::decode)?,
		})
	}
}

/// The cut-down conference record `get-uconf-stat` (opcode 78) returns; what
/// the object cache actually keeps, since it's what most lookups need.
#[derive(Debug, Clone)]
pub struct UConference {
	pub name: String,
	pub kind: ConfType,
	pub highest_local_no: i32,
	pub nice: i32,
}

impl Decode for UConference {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(UConference {
			name: String::decode(r)?,
			kind: ConfType::decode(r)?,
			highest_local_no: r.read_int()?,
			nice: r.read_int()?,
		})
	}
}
