// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use lyskom_wire::{latin1_to_string, string_to_latin1, ArgWriter, Decode, Encode, Reader, WireResult};

use crate::flags::AuxItemFlags;
use crate::time::Time;

/// The well-known aux-item tag table. Tags 1-35 are the core protocol's;
/// the `10000+` series are client-specific extensions (the
/// `elisp-client-*` and `mx-mime-*` families).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuxItemTag {
	ContentType,
	FastReply,
	CrossReference,
	NoComments,
	PersonalComment,
	RequestConfirmation,
	ReadConfirm,
	Redirect,
	XFace,
	AlternateName,
	PgpSignature,
	PgpPublicKey,
	EMailAddress,
	FaqText,
	CreatingSoftware,
	MxAuthor,
	MxFrom,
	MxReplyTo,
	MxTo,
	MxCc,
	MxDate,
	MxMessageId,
	MxInReplyTo,
	MxMisc,
	MxAllowFilter,
	MxRejectForward,
	NotifyComments,
	FaqForConf,
	RecommendedConf,
	AllowedContentType,
	CanonicalName,
	MxListName,
	SendCommentsTo,
	WorldReadable,
	MxRefuseImport,
	ElispClientReadFaq,
	ElispClientRejectedRecommendation,
	MxMimeBelongsTo,
	MxMimePartIn,
	MxMimeMisc,
	MxEnvelopeSender,
	MxMimeFileName,
	MxAllowEnvelopeSenderRegexp,
	/// An aux-item tag number this client has no named variant for.
	Unknown(i32),
}

impl AuxItemTag {
	pub fn from_wire(no: i32) -> Self {
		match no {
			1 => Self::ContentType,
			2 => Self::FastReply,
			3 => Self::CrossReference,
			4 => Self::NoComments,
			5 => Self::PersonalComment,
			6 => Self::RequestConfirmation,
			7 => Self::ReadConfirm,
			8 => Self::Redirect,
			9 => Self::XFace,
			10 => Self::AlternateName,
			11 => Self::PgpSignature,
			12 => Self::PgpPublicKey,
			13 => Self::EMailAddress,
			14 => Self::FaqText,
			15 => Self::CreatingSoftware,
			16 => Self::MxAuthor,
			17 => Self::MxFrom,
			18 => Self::MxReplyTo,
			19 => Self::MxTo,
			20 => Self::MxCc,
			21 => Self::MxDate,
			22 => Self::MxMessageId,
			23 => Self::MxInReplyTo,
			24 => Self::MxMisc,
			25 => Self::MxAllowFilter,
			26 => Self::MxRejectForward,
			27 => Self::NotifyComments,
			28 => Self::FaqForConf,
			29 => Self::RecommendedConf,
			30 => Self::AllowedContentType,
			31 => Self::CanonicalName,
			32 => Self::MxListName,
			33 => Self::SendCommentsTo,
			34 => Self::WorldReadable,
			35 => Self::MxRefuseImport,
			10000 => Self::ElispClientReadFaq,
			10001 => Self::ElispClientRejectedRecommendation,
			10100 => Self::MxMimeBelongsTo,
			10101 => Self::MxMimePartIn,
			10102 => Self::MxMimeMisc,
			10103 => Self::MxEnvelopeSender,
			10104 => Self::MxMimeFileName,
			10105 => Self::MxAllowEnvelopeSenderRegexp,
			other => Self::Unknown(other),
		}
	}

	pub fn wire_number(self) -> i32 {
		match self {
			Self::ContentType => 1,
			Self::FastReply => 2,
			Self::CrossReference => 3,
			Self::NoComments => 4,
			Self::PersonalComment => 5,
			Self::RequestConfirmation => 6,
			Self::ReadConfirm => 7,
			Self::Redirect => 8,
			Self::XFace => 9,
			Self::AlternateName => 10,
			Self::PgpSignature => 11,
			Self::PgpPublicKey => 12,
			Self::EMailAddress => 13,
			Self::FaqText => 14,
			Self::CreatingSoftware => 15,
			Self::MxAuthor => 16,
			Self::MxFrom => 17,
			Self::MxReplyTo => 18,
			Self::MxTo => 19,
			Self::MxCc => 20,
			Self::MxDate => 21,
			Self::MxMessageId => 22,
			Self::MxInReplyTo => 23,
			Self::MxMisc => 24,
			Self::MxAllowFilter => 25,
			Self::MxRejectForward => 26,
			Self::NotifyComments => 27,
			Self::FaqForConf => 28,
			Self::RecommendedConf => 29,
			Self::AllowedContentType => 30,
			Self::CanonicalName => 31,
			Self::MxListName => 32,
			Self::SendCommentsTo => 33,
			Self::WorldReadable => 34,
			Self::MxRefuseImport => 35,
			Self::ElispClientReadFaq => 10000,
			Self::ElispClientRejectedRecommendation => 10001,
			Self::MxMimeBelongsTo => 10100,
			Self::MxMimePartIn => 10101,
			Self::MxMimeMisc => 10102,
			Self::MxEnvelopeSender => 10103,
			Self::MxMimeFileName => 10104,
			Self::MxAllowEnvelopeSenderRegexp => 10105,
			Self::Unknown(n) => n,
		}
	}

	/// Human-readable name, the `aux_item_number_to_name` table.
	pub fn name(self) -> &'static str {
		match self {
			Self::ContentType => "content-type",
			Self::FastReply => "fast-reply",
			Self::CrossReference => "cross-reference",
			Self::NoComments => "no-comments",
			Self::PersonalComment => "personal-comment",
			Self::RequestConfirmation => "request-confirmation",
			Self::ReadConfirm => "read-confirm",
			Self::Redirect => "redirect",
			Self::XFace => "x-face",
			Self::AlternateName => "alternate-name",
			Self::PgpSignature => "pgp-signature",
			Self::PgpPublicKey => "pgp-public-key",
			Self::EMailAddress => "e-mail-address",
			Self::FaqText => "faq-text",
			Self::CreatingSoftware => "creating-software",
			Self::MxAuthor => "mx-author",
			Self::MxFrom => "mx-from",
			Self::MxReplyTo => "mx-reply-to",
			Self::MxTo => "mx-to",
			Self::MxCc => "mx-cc",
			Self::MxDate => "mx-date",
			Self::MxMessageId => "mx-message-id",
			Self::MxInReplyTo => "mx-in-reply-to",
			Self::MxMisc => "mx-misc",
			Self::MxAllowFilter => "mx-allow-filter",
			Self::MxRejectForward => "mx-reject-forward",
			Self::NotifyComments => "notify-comments",
			Self::FaqForConf => "faq-for-conf",
			Self::RecommendedConf => "recommended-conf",
			Self::AllowedContentType => "allowed-content-type",
			Self::CanonicalName => "canonical-name",
			Self::MxListName => "mx-list-name",
			Self::SendCommentsTo => "send-comments-to",
			Self::WorldReadable => "world-readable",
			Self::MxRefuseImport => "mx-refuse-import",
			Self::ElispClientReadFaq => "elisp-client-read-faq",
			Self::ElispClientRejectedRecommendation => "elisp-client-rejected-recommendation",
			Self::MxMimeBelongsTo => "mx-mime-belongs-to",
			Self::MxMimePartIn => "mx-mime-part-in",
			Self::MxMimeMisc => "mx-mime-misc",
			Self::MxEnvelopeSender => "mx-envelope-sender",
			Self::MxMimeFileName => "mx-mime-file-name",
			Self::MxAllowEnvelopeSenderRegexp => "mx-allow-envelope-sender-regexp",
			Self::Unknown(_) => "unknown",
		}
	}
}

/// An extensible tagged record attached to texts, conferences, letterboxes,
/// or the server. Doubles as `Aux-Item` on reception and `Aux-Item-Input`
/// when sent: `aux_no`/`creator`/`created_at` are only ever populated by
/// decoding, never by a caller building one to send.
#[derive(Debug, Clone)]
pub struct AuxItem {
	pub aux_no: Option<i32>,
	pub tag: AuxItemTag,
	pub creator: Option<i32>,
	pub created_at: Option<Time>,
	pub flags: AuxItemFlags,
	pub inherit_limit: i32,
	pub data: Vec<u8>,
}

impl AuxItem {
	/// Builds an aux-item to send to the server: no `aux_no`/`creator`/
	/// `created_at`, since those are server-assigned.
	pub fn new(tag: AuxItemTag, data: impl Into<Vec<u8>>) -> Self {
		Self {
			aux_no: None,
			tag,
			creator: None,
			created_at: None,
			flags: AuxItemFlags::empty(),
			inherit_limit: 0,
			data: data.into(),
		}
	}

	pub fn data_as_string(&self) -> String {
		latin1_to_string(&self.data)
	}
}

impl Decode for AuxItem {
	fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
		Ok(AuxItem {
			aux_no: Some(r.read_int()?),
			tag: AuxItemTag::from_wire(r.read_int()?),
			creator: Some(r.read_int()?),
			created_at: Some(Time::decode(r)?),
			flags: AuxItemFlags::decode(r)?,
			inherit_limit: r.read_int()?,
			data: r.read_hollerith()?,
		})
	}
}

impl Encode for AuxItem {
	fn encode(&self, w: &mut ArgWriter) {
		w.int(self.tag.wire_number());
		self.flags.encode(w);
		w.int(self.inherit_limit).hollerith(&self.data);
	}
}

/// All aux-items in `items` whose tag is `tag`.
pub fn all_with_tag(items: &[AuxItem], tag: AuxItemTag) -> Vec<&AuxItem> {
	items.iter().filter(|item| item.tag == tag).collect()
}

/// The first aux-item in `items` whose tag is `tag`, if any.
pub fn first_with_tag(items: &[AuxItem], tag: AuxItemTag) -> Option<&AuxItem> {
	items.iter().find(|item| item.tag == tag)
}

/// Renders an aux-item's data as text, choosing latin1 over the supplied
/// crate helper only when `string_to_latin1`/`latin1_to_string` are in
/// scope; kept here so callers don't need to import `lyskom_wire` directly
/// just to read an aux-item's payload.
pub fn data_to_latin1(data: &str) -> Vec<u8> {
	string_to_latin1(data)
}
