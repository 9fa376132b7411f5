// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use lyskom_wire::{ArgWriter, Decode, Encode, Reader, WireError, WireResult};

use crate::ids::ConfNo;
use crate::time::Time;

/// Raw misc-info tag numbers, wire-compatible, before the client folds them
/// into [`CookedMiscInfo`].
const MI_RECPT: i32 = 0;
const MI_CC_RECPT: i32 = 1;
const MI_COMM_TO: i32 = 2;
const MI_COMM_IN: i32 = 3;
const MI_FOOTN_TO: i32 = 4;
const MI_FOOTN_IN: i32 = 5;
const MI_LOC_NO: i32 = 6;
const MI_REC_TIME: i32 = 7;
const MI_SENT_BY: i32 = 8;
const MI_SENT_AT: i32 = 9;
const MI_BCC_RECPT: i32 = 15;

/// One raw (tag, value) tuple as it appears on the wire, before recipients
/// and comment references are folded together. The value is a `Time` for
/// `rec-time`/`sent-at`, an integer otherwise.
enum RawValue {
	Int(i32),
	Time(Time),
}

struct RawMiscInfo {
	tag: i32,
	value: RawValue,
}

impl Decode for RawMiscInfo {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		let tag = r.read_int()?;
		let value = if tag == MI_REC_TIME || tag == MI_SENT_AT {
			RawValue::Time(Time::decode(r)?)
		} else {
			RawValue::Int(r.read_int()?)
		};
		Ok(RawMiscInfo { tag, value })
	}
}

impl RawMiscInfo {
	fn int(&self) -> WireResult<i32> {
		match self.value {
			RawValue::Int(v) => Ok(v),
			RawValue::Time(_) => {
				Err(WireError::UnexpectedChar { found: 'T', expected: "an integer misc-info value" })
			}
		}
	}

	fn time(&self) -> WireResult<Time> {
		match self.value {
			RawValue::Time(t) => Ok(t),
			RawValue::Int(_) => {
				Err(WireError::UnexpectedChar { found: 'I', expected: "a Time misc-info value" })
			}
		}
	}
}

/// Which of the three recipient lists (`to`/`cc`/`bcc`) a [`MIRecipient`]
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientKind {
	To,
	Cc,
	Bcc,
}

impl RecipientKind {
	fn from_tag(tag: i32) -> Option<Self> {
		match tag {
			MI_RECPT => Some(Self::To),
			MI_CC_RECPT => Some(Self::Cc),
			MI_BCC_RECPT => Some(Self::Bcc),
			_ => None,
		}
	}

	fn tag(self) -> i32 {
		match self {
			Self::To => MI_RECPT,
			Self::Cc => MI_CC_RECPT,
			Self::Bcc => MI_BCC_RECPT,
		}
	}
}

/// A single recipient entry, with the trailing attributes the server may
/// attach (`loc-no` is always present once any is sent; the rest are only
/// present when the server actually sent them).
#[derive(Debug, Clone)]
pub struct MIRecipient {
	pub kind: RecipientKind,
	pub recpt: ConfNo,
	pub loc_no: i32,
	pub rec_time: Option<Time>,
	pub sent_by: Option<i32>,
	pub sent_at: Option<Time>,
}

impl MIRecipient {
	pub fn new(kind: RecipientKind, recpt: ConfNo) -> Self {
		Self { kind, recpt, loc_no: 0, rec_time: None, sent_by: None, sent_at: None }
	}
}

/// Which of `comment`/`footnote` a [`MICommentTo`] or [`MICommentIn`]
/// entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
	Comment,
	Footnote,
}

impl CommentKind {
	fn from_to_tag(tag: i32) -> Option<Self> {
		match tag {
			MI_COMM_TO => Some(Self::Comment),
			MI_FOOTN_TO => Some(Self::Footnote),
			_ => None,
		}
	}

	fn from_in_tag(tag: i32) -> Option<Self> {
		// comm-in/footn-in are comm-to/footn-to's tag minus one, a quirk of
		// the wire format kept as-is rather than normalized away.
		match tag {
			MI_COMM_IN => Some(Self::Comment),
			MI_FOOTN_IN => Some(Self::Footnote),
			_ => None,
		}
	}

	fn to_tag(self) -> i32 {
		match self {
			Self::Comment => MI_COMM_TO,
			Self::Footnote => MI_FOOTN_TO,
		}
	}
}

/// An outgoing comment/footnote reference this text makes to another text.
#[derive(Debug, Clone)]
pub struct MICommentTo {
	pub kind: CommentKind,
	pub text_no: i32,
	pub sent_by: Option<i32>,
	pub sent_at: Option<Time>,
}

impl MICommentTo {
	pub fn new(kind: CommentKind, text_no: i32) -> Self {
		Self { kind, text_no, sent_by: None, sent_at: None }
	}
}

/// An incoming comment/footnote reference another text makes to this one.
/// Read-only: the server never accepts these back.
#[derive(Debug, Clone)]
pub struct MICommentIn {
	pub kind: CommentKind,
	pub text_no: i32,
}

/// The three lists the client folds a flat misc-info stream into.
/// Represents the whole array, not one item.
#[derive(Debug, Clone, Default)]
pub struct CookedMiscInfo {
	pub recipient_list: Vec<MIRecipient>,
	pub comment_to_list: Vec<MICommentTo>,
	pub comment_in_list: Vec<MICommentIn>,
}

impl CookedMiscInfo {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Decode for CookedMiscInfo {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		let raw: Vec<RawMiscInfo> = r.read_array(RawMiscInfo::decode)?;
		let mut cooked = CookedMiscInfo::new();
		let mut i = 0;
		while i < raw.len() {
			let tag = raw[i].tag;
			if let Some(kind) = RecipientKind::from_tag(tag) {
				let mut rec = MIRecipient::new(kind, ConfNo(raw[i].int()?));
				i += 1;
				while i < raw.len() {
					match raw[i].tag {
						MI_LOC_NO => rec.loc_no = raw[i].int()?,
						MI_REC_TIME => rec.rec_time = Some(raw[i].time()?),
						MI_SENT_BY => rec.sent_by = Some(raw[i].int()?),
						MI_SENT_AT => rec.sent_at = Some(raw[i].time()?),
						_ => break,
					}
					i += 1;
				}
				cooked.recipient_list.push(rec);
			} else if let Some(kind) = CommentKind::from_to_tag(tag) {
				let mut ct = MICommentTo::new(kind, raw[i].int()?);
				i += 1;
				while i < raw.len() {
					match raw[i].tag {
						MI_SENT_BY => ct.sent_by = Some(raw[i].int()?),
						MI_SENT_AT => ct.sent_at = Some(raw[i].time()?),
						_ => break,
					}
					i += 1;
				}
				cooked.comment_to_list.push(ct);
			} else if let Some(kind) = CommentKind::from_in_tag(tag) {
				cooked.comment_in_list.push(MICommentIn { kind, text_no: raw[i].int()? });
				i += 1;
			} else {
				return Err(WireError::UnexpectedChar { found: '?', expected: "a known misc-info tag" });
			}
		}
		Ok(cooked)
	}
}

impl Encode for CookedMiscInfo {
	/// Emits recipient tuples, then comment-to tuples, in list order;
	/// comment-in is never emitted.
	fn encode(&self, w: &mut ArgWriter) {
		let mut tuples: Vec<(i32, i32)> = Vec::new();
		for rec in &self.recipient_list {
			tuples.push((rec.kind.tag(), rec.recpt.0));
		}
		for ct in &self.comment_to_list {
			tuples.push((ct.kind.to_tag(), ct.text_no));
		}
		w.array(&tuples, |w, &(tag, val)| {
			w.int(tag).int(val);
		});
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;

	fn reader_over(s: &str) -> Reader<Cursor<Vec<u8>>> {
		Reader::new(Cursor::new(s.as_bytes().to_vec()))
	}

	#[test]
	fn recipient_consumes_trailing_attribute_tuples() {
		// recpt(0)=6, loc-no(6)=42, sent-by(8)=99, comm-to(2)=1234,
		// sent-at(9)=<time>, comm-in(3)=555. 6 top-level tuples.
		let time = "0 0 0 0 0 0 0 0 0";
		let wire = format!("6 {{ 0 6 6 42 8 99 2 1234 9 {time} 3 555 }}");
		let mut r = reader_over(&wire);
		let cooked = CookedMiscInfo::decode(&mut r).unwrap();

		assert_eq!(cooked.recipient_list.len(), 1);
		let rec = &cooked.recipient_list[0];
		assert_eq!(rec.kind, RecipientKind::To);
		assert_eq!(rec.recpt, ConfNo(6));
		assert_eq!(rec.loc_no, 42);
		assert_eq!(rec.sent_by, Some(99));
		assert!(rec.rec_time.is_none());

		assert_eq!(cooked.comment_to_list.len(), 1);
		let ct = &cooked.comment_to_list[0];
		assert_eq!(ct.kind, CommentKind::Comment);
		assert_eq!(ct.text_no, 1234);
		assert!(ct.sent_at.is_some());
		assert!(ct.sent_by.is_none());

		assert_eq!(cooked.comment_in_list.len(), 1);
		let ci = &cooked.comment_in_list[0];
		assert_eq!(ci.kind, CommentKind::Comment);
		assert_eq!(ci.text_no, 555);
	}

	#[test]
	fn comment_in_is_footnote_when_tag_is_footn_in() {
		let wire = "1 { 5 77 }";
		let mut r = reader_over(wire);
		let cooked = CookedMiscInfo::decode(&mut r).unwrap();
		assert_eq!(cooked.comment_in_list.len(), 1);
		assert_eq!(cooked.comment_in_list[0].kind, CommentKind::Footnote);
		assert_eq!(cooked.comment_in_list[0].text_no, 77);
	}

	#[test]
	fn unexpected_tag_is_a_protocol_error() {
		let wire = "1 { 123 1 }";
		let mut r = reader_over(wire);
		assert!(CookedMiscInfo::decode(&mut r).is_err());
	}

	#[test]
	fn encode_omits_comment_in_and_preserves_order() {
		let mut cooked = CookedMiscInfo::new();
		let mut rec = MIRecipient::new(RecipientKind::Cc, ConfNo(10));
		rec.loc_no = 1;
		cooked.recipient_list.push(rec);
		cooked.comment_to_list.push(MICommentTo::new(CommentKind::Footnote, 99));
		cooked.comment_in_list.push(MICommentIn { kind: CommentKind::Comment, text_no: 1 });

		let mut w = ArgWriter::new();
		cooked.encode(&mut w);
		let bytes = w.into_bytes();
		let text = String::from_utf8(bytes).unwrap();
		// Two emitted tuples (4 ints): cc-recpt/10, then footn-to/99. No
		// trace of the comment-in entry anywhere in the output.
		assert_eq!(text, "2 { 1 10 4 99 }");
	}
}
