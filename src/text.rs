// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use lyskom_wire::{Decode, Reader, WireError, WireResult};

use crate::aux_item::AuxItem;
use crate::misc_info::CookedMiscInfo;
use crate::time::Time;

/// The record returned by `get-text-stat` (opcode 90). `old_format` governs
/// whether the trailing `aux_items` array is present on the wire at all:
/// pre-aux-item servers never send it.
#[derive(Debug, Clone)]
pub struct TextStat {
	pub creation_time: Time,
	pub author: i32,
	pub no_of_lines: i32,
	pub no_of_chars: i32,
	pub no_of_marks: i32,
	pub misc_info: CookedMiscInfo,
	pub aux_items: Vec<AuxItem>,
}

impl TextStat {
	pub fn decode_with_format<R: Read>(r: &mut Reader<R>, old_format: bool) -> WireResult<Self> {
		let creation_time = Time::decode(r)?;
		let author = r.read_int()?;
		let no_of_lines = r.read_int()?;
		let no_of_chars = r.read_int()?;
		let no_of_marks = r.read_int()?;
		let misc_info = CookedMiscInfo::decode(r)?;
		let aux_items = if old_format { Vec::new() } else { r.read_array(AuxItem::decode)? };
		Ok(TextStat { creation_time, author, no_of_lines, no_of_chars, no_of_marks, misc_info, aux_items })
	}
}

impl Decode for TextStat {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Self::decode_with_format(r, false)
	}
}

/// The record returned by `get-map` (opcode 34): a conference's local text
/// numbers, starting at `first_local_no`.
#[derive(Debug, Clone)]
pub struct TextList {
	pub first_local_no: i32,
	pub texts: Vec<i32>,
}

impl Decode for TextList {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(TextList { first_local_no: r.read_int()?, texts: Vec::decode(r)? })
	}
}

#[derive(Debug, Clone, Copy)]
pub struct TextNumberPair {
	pub local_number: i32,
	pub global_number: i32,
}

impl Decode for TextNumberPair {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(TextNumberPair { local_number: r.read_int()?, global_number: r.read_int()? })
	}
}

/// The record returned by `local-to-global`/`map-created-texts` (opcodes 103
/// and 104): a local-to-global text number mapping block,
/// either sparse (explicit pairs) or dense (a run starting at `dense_first`).
#[derive(Debug, Clone)]
pub struct TextMapping {
	pub range_begin: i32,
	pub range_end: i32,
	pub later_texts_exists: bool,
	pub block: TextMappingBlock,
}

#[derive(Debug, Clone)]
pub enum TextMappingBlock {
	Sparse(Vec<TextNumberPair>),
	Dense { first: i32, texts: Vec<i32> },
}

impl TextMapping {
	/// Flattens either block representation into `(local, global)` pairs, in
	/// local-number order.
	pub fn pairs(&self) -> Vec<(i32, i32)> {
		match &self.block {
			TextMappingBlock::Sparse(list) => {
				list.iter().map(|p| (p.local_number, p.global_number)).collect()
			}
			TextMappingBlock::Dense { first, texts } => {
				texts.iter().enumerate().map(|(i, &g)| (first + i as i32, g)).collect()
			}
		}
	}
}

impl Decode for TextMapping {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		let range_begin = r.read_int()?;
		let range_end = r.read_int()?;
		let later_texts_exists = r.read_int()? != 0;
		let block_type = r.read_int()?;
		let block = match block_type {
			0 => TextMappingBlock::Sparse(r.read_array(TextNumberPair::decode)?),
			1 => {
				let first = r.read_int()?;
				let texts: Vec<i32> = Vec::decode(r)?;
				TextMappingBlock::Dense { first, texts }
			}
			_ => return Err(WireError::UnexpectedChar { found: '?', expected: "a text mapping block type (0 or 1)" }),
		};
		Ok(TextMapping { range_begin, range_end, later_texts_exists, block })
	}
}

/// A mark the calling person has put on a text, returned by `get-marks`
/// (opcode 23).
#[derive(Debug, Clone, Copy)]
pub struct Mark {
	pub text_no: i32,
	pub kind: i32,
}

impl Decode for Mark {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(Mark { text_no: r.read_int()?, kind: r.read_int()? })
	}
}
