// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use lyskom_wire::{Decode, Reader, WireResult};

use crate::flags::SessionFlags;
use crate::time::Time;

/// One entry of `who-is-on-dynamic` (opcode 83): what a session is doing
/// right now.
#[derive(Debug, Clone)]
pub struct DynamicSessionInfo {
	pub session: i32,
	pub person: i32,
	pub working_conference: i32,
	pub idle_time: i32,
	pub flags: SessionFlags,
	pub what_am_i_doing: String,
}

impl Decode for DynamicSessionInfo {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(DynamicSessionInfo {
			session: r.read_int()?,
			person: r.read_int()?,
			working_conference: r.read_int()?,
			idle_time: r.read_int()?,
			flags: SessionFlags::decode(r)?,
			what_am_i_doing: String::decode(r)?,
		})
	}
}

/// The unchanging half of a session's identity: who connected from where.
#[derive(Debug, Clone)]
pub struct StaticSessionInfo {
	pub username: String,
	pub hostname: String,
	pub ident_user: String,
	pub connection_time: Time,
}

impl Decode for StaticSessionInfo {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(StaticSessionInfo {
			username: String::decode(r)?,
			hostname: String::decode(r)?,
			ident_user: String::decode(r)?,
			connection_time: Time::decode(r)?,
		})
	}
}

/// A session's scheduling weight, as set by `set-scheduling` (opcode 119)
/// and read back by `get-scheduling` (opcode 118).
#[derive(Debug, Clone, Copy)]
pub struct SchedulingInfo {
	pub priority: i32,
	pub weight: i32,
}

impl Decode for SchedulingInfo {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(SchedulingInfo { priority: r.read_int()?, weight: r.read_int()? })
	}
}

/// One entry of `who-is-on`, obsoleted by `who-is-on-dynamic` (opcode 83)
/// and kept only as the payload of the `async-i-am-on` message.
#[derive(Debug, Clone)]
pub struct WhoInfo {
	pub person: i32,
	pub working_conference: i32,
	pub session: i32,
	pub what_am_i_doing: String,
	pub username: String,
}

impl Decode for WhoInfo {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(WhoInfo {
			person: r.read_int()?,
			working_conference: r.read_int()?,
			session: r.read_int()?,
			what_am_i_doing: String::decode(r)?,
			username: String::decode(r)?,
		})
	}
}
