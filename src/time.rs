// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use lyskom_wire::{ArgWriter, Decode, Encode, Reader, WireResult};

/// A LysKOM `Time`, which is a C `struct tm` flattened onto the wire field
/// by field, in the server's local civil time. `year` is years since 1900,
/// `month` is 0-11, and `weekday`/`year_day` are redundant with the other
/// fields but are round-tripped anyway since the server sends and expects
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
	pub seconds: i32,
	pub minutes: i32,
	pub hours: i32,
	pub day: i32,
	pub month: i32,
	pub year: i32,
	pub weekday: i32,
	pub year_day: i32,
	pub is_dst: bool,
}

impl Decode for Time {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(Time {
			seconds: r.read_int()?,
			minutes: r.read_int()?,
			hours: r.read_int()?,
			day: r.read_int()?,
			month: r.read_int()?,
			year: r.read_int()?,
			weekday: r.read_int()?,
			year_day: r.read_int()?,
			is_dst: r.read_int()? != 0,
		})
	}
}

impl Encode for Time {
	fn encode(&self, w: &mut ArgWriter) {
		w.int(self.seconds)
			.int(self.minutes)
			.int(self.hours)
			.int(self.day)
			.int(self.month)
			.int(self.year)
			.int(self.weekday)
			.int(self.year_day)
			.int(self.is_dst as i32);
	}
}
