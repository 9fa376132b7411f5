// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use lyskom_wire::{ArgWriter, Decode, Encode, Reader, WireResult};

use crate::aux_item::AuxItem;
use crate::time::Time;

/// The record `get-info` (opcode 94) returns. Doubles as `Info` on
/// reception and `Info-Old` when sent back via `set-info`: the trailing
/// `aux_item_list` is never part of the outbound shape.
#[derive(Debug, Clone)]
pub struct Info {
	pub version: i32,
	pub conf_pres_conf: i32,
	pub pers_pres_conf: i32,
	pub motd_conf: i32,
	pub kom_news_conf: i32,
	pub motd_of_lyskom: i32,
	pub aux_item_list: Vec<AuxItem>,
}

impl Decode for Info {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(Info {
			version: r.read_int()?,
			conf_pres_conf: r.read_int()?,
			pers_pres_conf: r.read_int()?,
			motd_conf: r.read_int()?,
			kom_news_conf: r.read_int()?,
			motd_of_lyskom: r.read_int()?,
			aux_item_list: r.read_array(AuxItem::decode)?,
		})
	}
}

impl Info {
	/// Encodes the `Info-Old` shape `set-info` (opcode 79) actually sends:
	/// the six integers only, no aux items.
	pub fn encode_old(&self, w: &mut ArgWriter) {
		w.int(self.version)
			.int(self.conf_pres_conf)
			.int(self.pers_pres_conf)
			.int(self.motd_conf)
			.int(self.kom_news_conf)
			.int(self.motd_of_lyskom);
	}
}

/// Returned by `get-version-info` (opcode 75).
#[derive(Debug, Clone)]
pub struct VersionInfo {
	pub protocol_version: i32,
	pub server_software: String,
	pub software_version: String,
}

impl Decode for VersionInfo {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(VersionInfo {
			protocol_version: r.read_int()?,
			server_software: String::decode(r)?,
			software_version: String::decode(r)?,
		})
	}
}

/// Returned by `get-boottime-info` (opcode 113), new in protocol 11.
#[derive(Debug, Clone)]
pub struct StaticServerInfo {
	pub boot_time: Time,
	pub save_time: Time,
	pub db_status: String,
	pub existing_texts: i32,
	pub highest_text_no: i32,
	pub existing_confs: i32,
	pub existing_persons: i32,
	pub highest_conf_no: i32,
}

impl Decode for StaticServerInfo {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(StaticServerInfo {
			boot_time: Time::decode(r)?,
			save_time: Time::decode(r)?,
			db_status: String::decode(r)?,
			existing_texts: r.read_int()?,
			highest_text_no: r.read_int()?,
			existing_confs: r.read_int()?,
			existing_persons: r.read_int()?,
			highest_conf_no: r.read_int()?,
		})
	}
}

/// The catalog of available measurements, returned by
/// `get-stats-description` (opcode 111).
#[derive(Debug, Clone)]
pub struct StatsDescription {
	pub what: Vec<String>,
	pub when: Vec<i32>,
}

impl Decode for StatsDescription {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(StatsDescription { what: Vec::decode(r)?, when: Vec::decode(r)? })
	}
}

/// One sampled measurement, returned by `get-stats` (opcode 112).
#[derive(Debug, Clone, Copy)]
pub struct Stats {
	pub average: f64,
	pub ascent_rate: f64,
	pub descent_rate: f64,
}

impl Decode for Stats {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(Stats { average: r.read_float()?, ascent_rate: r.read_float()?, descent_rate: r.read_float()? })
	}
}
