// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use lyskom_wire::WireError;
use thiserror::Error;

/// Top-level failure type for everything in this crate: server errors
/// carry a numeric code and status, local errors are connection-ending
/// protocol violations, and lookup misses are never an `Error` at all
/// (they are plain `Option`/empty-`Vec` returns).
#[derive(Error, Debug)]
pub enum Error {
	/// The server rejected a request with `%<id> <error_no> <error_status>`.
	#[error("server error {code}: status {status}")]
	Server { code: ErrorCode, status: i32 },

	/// A connection-ending failure local to this client: malformed framing,
	/// an async tag with no registered parser, or the socket closing.
	#[error(transparent)]
	Local(#[from] LocalError),

	/// A wire-level codec failure surfacing directly, e.g. while encoding
	/// an outgoing request's Hollerith-length arguments.
	#[error(transparent)]
	Wire(#[from] WireError),
}

/// Local, non-server failures. Any of these is fatal for the connection:
/// later calls should fail immediately rather than block forever on a
/// socket that will never answer.
#[derive(Error, Debug)]
pub enum LocalError {
	/// The handshake banner was not exactly `LysKOM\n`.
	#[error("bad initial response from server")]
	BadInitialResponse,

	/// A reply or error frame referenced a request id this connection never
	/// registered.
	#[error("reply for unknown request id {0}")]
	BadRequestId(i32),

	/// Malformed framing, or a discriminator byte that was none of
	/// `=`, `%`, `:`.
	#[error("protocol error: {0}")]
	Protocol(#[from] WireError),

	/// An async message tag with no registered parser.
	#[error("unimplemented async message tag {0}")]
	UnimplementedAsync(i32),

	/// The socket was closed, or returned EOF, while a reply was still
	/// outstanding.
	#[error("error receiving from server: {0}")]
	Receive(#[from] io::Error),
}

/// One variant per Protocol A error code (wire codes 2-61).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
	NotImplemented,
	ObsoleteCall,
	InvalidPassword,
	StringTooLong,
	LoginFirst,
	LoginDisallowed,
	ConferenceZero,
	UndefinedConference,
	UndefinedPerson,
	AccessDenied,
	PermissionDenied,
	NotMember,
	NoSuchText,
	TextZero,
	NoSuchLocalText,
	LocalTextZero,
	BadName,
	IndexOutOfRange,
	ConferenceExists,
	PersonExists,
	SecretPublic,
	Letterbox,
	LdbError,
	IllegalMisc,
	IllegalInfoType,
	AlreadyRecipient,
	AlreadyComment,
	AlreadyFootnote,
	NotRecipient,
	NotComment,
	NotFootnote,
	RecipientLimit,
	CommentLimit,
	FootnoteLimit,
	MarkLimit,
	NotAuthor,
	NoConnect,
	OutOfMemory,
	ServerIsCrazy,
	ClientIsCrazy,
	UndefinedSession,
	RegexpError,
	NotMarked,
	TemporaryFailure,
	LongArray,
	AnonymousRejected,
	IllegalAuxItem,
	AuxItemPermission,
	UnknownAsync,
	InternalError,
	FeatureDisabled,
	MessageNotSent,
	InvalidMembershipType,
	InvalidRange,
	InvalidRangeList,
	UndefinedMeasurement,
	PriorityDenied,
	WeightDenied,
	WeightZero,
	BadBool,
	/// A wire error code this client doesn't have a named variant for yet.
	Unknown(i32),
}

impl ErrorCode {
	/// Maps a wire error number to its named variant.
	pub fn from_wire(no: i32) -> Self {
		match no {
			2 => Self::NotImplemented,
			3 => Self::ObsoleteCall,
			4 => Self::InvalidPassword,
			5 => Self::StringTooLong,
			6 => Self::LoginFirst,
			7 => Self::LoginDisallowed,
			8 => Self::ConferenceZero,
			9 => Self::UndefinedConference,
			10 => Self::UndefinedPerson,
			11 => Self::AccessDenied,
			12 => Self::PermissionDenied,
			13 => Self::NotMember,
			14 => Self::NoSuchText,
			15 => Self::TextZero,
			16 => Self::NoSuchLocalText,
			17 => Self::LocalTextZero,
			18 => Self::BadName,
			19 => Self::IndexOutOfRange,
			20 => Self::ConferenceExists,
			21 => Self::PersonExists,
			22 => Self::SecretPublic,
			23 => Self::Letterbox,
			24 => Self::LdbError,
			25 => Self::IllegalMisc,
			26 => Self::IllegalInfoType,
			27 => Self::AlreadyRecipient,
			28 => Self::AlreadyComment,
			29 => Self::AlreadyFootnote,
			30 => Self::NotRecipient,
			31 => Self::NotComment,
			32 => Self::NotFootnote,
			33 => Self::RecipientLimit,
			34 => Self::CommentLimit,
			35 => Self::FootnoteLimit,
			36 => Self::MarkLimit,
			37 => Self::NotAuthor,
			38 => Self::NoConnect,
			39 => Self::OutOfMemory,
			40 => Self::ServerIsCrazy,
			41 => Self::ClientIsCrazy,
			42 => Self::UndefinedSession,
			43 => Self::RegexpError,
			44 => Self::NotMarked,
			45 => Self::TemporaryFailure,
			46 => Self::LongArray,
			47 => Self::AnonymousRejected,
			48 => Self::IllegalAuxItem,
			49 => Self::AuxItemPermission,
			50 => Self::UnknownAsync,
			51 => Self::InternalError,
			52 => Self::FeatureDisabled,
			53 => Self::MessageNotSent,
			54 => Self::InvalidMembershipType,
			55 => Self::InvalidRange,
			56 => Self::InvalidRangeList,
			57 => Self::UndefinedMeasurement,
			58 => Self::PriorityDenied,
			59 => Self::WeightDenied,
			60 => Self::WeightZero,
			61 => Self::BadBool,
			other => Self::Unknown(other),
		}
	}

	/// `true` for [`ErrorCode::NoSuchLocalText`], the one server error an
	/// unread-text walk treats as a clean end-of-enumeration signal rather
	/// than a failure.
	pub fn is_no_such_local_text(&self) -> bool {
		matches!(self, Self::NoSuchLocalText)
	}
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
