// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use lyskom_wire::{Decode, Reader, WireResult};

use crate::flags::{PersonalFlags, PrivBits};
use crate::time::Time;

/// The record returned by `get-person-stat` (opcode 49).
#[derive(Debug, Clone)]
pub struct Person {
	pub username: String,
	pub privileges: PrivBits,
	pub flags: PersonalFlags,
	pub last_login: Time,
	pub user_area: i32,
	pub total_time_present: i32,
	pub sessions: i32,
	pub created_lines: i32,
	pub created_bytes: i32,
	pub read_texts: i32,
	pub no_of_text_fetches: i32,
	pub created_persons: i32,
	pub created_confs: i32,
	pub first_created_local_no: i32,
	pub no_of_created_texts: i32,
	pub no_of_marks: i32,
	pub no_of_confs: i32,
}

impl Decode for Person {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(Person {
			username: String::decode(r)?,
			privileges: PrivBits::decode(r)?,
			flags: PersonalFlags::decode(r)?,
			last_login: Time::decode(r)?,
			user_area: r.read_int()?,
			total_time_present: r.read_int()?,
			sessions: r.read_int()?,
			created_lines: r.read_int()?,
			created_bytes: r.read_int()?,
			read_texts: r.read_int()?,
			no_of_text_fetches: r.read_int()?,
			created_persons: r.read_int()?,
			created_confs: r.read_int()?,
			first_created_local_no: r.read_int()?,
			no_of_created_texts: r.read_int()?,
			no_of_marks: r.read_int()?,
			no_of_confs: r.read_int()?,
		})
	}
}
