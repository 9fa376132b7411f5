// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use lyskom_wire::{Decode, Reader, WireResult};

use crate::aux_item::AuxItem;
use crate::session::WhoInfo;
use crate::text::TextStat;

pub const ASYNC_NEW_TEXT_OLD: i32 = 0;
pub const ASYNC_NEW_NAME: i32 = 5;
pub const ASYNC_I_AM_ON: i32 = 6;
pub const ASYNC_SYNC_DB: i32 = 7;
pub const ASYNC_LEAVE_CONF: i32 = 8;
pub const ASYNC_LOGIN: i32 = 9;
pub const ASYNC_REJECTED_CONNECTION: i32 = 11;
pub const ASYNC_SEND_MESSAGE: i32 = 12;
pub const ASYNC_LOGOUT: i32 = 13;
pub const ASYNC_DELETED_TEXT: i32 = 14;
pub const ASYNC_NEW_TEXT: i32 = 15;
pub const ASYNC_NEW_RECIPIENT: i32 = 16;
pub const ASYNC_SUB_RECIPIENT: i32 = 17;
pub const ASYNC_NEW_MEMBERSHIP: i32 = 18;
pub const ASYNC_NEW_USER_AREA: i32 = 19;
pub const ASYNC_NEW_PRESENTATION: i32 = 20;
pub const ASYNC_NEW_MOTD: i32 = 21;
pub const ASYNC_TEXT_AUX_CHANGED: i32 = 22;

/// Every async message tag this client knows how to decode.
/// `async-new-text-old` is kept even though no current server sends it:
/// a bug-compatible peer could still emit it.
#[derive(Debug, Clone)]
pub enum AsyncMessage {
	NewTextOld { text_no: i32, text_stat: TextStat },
	NewName { conf_no: i32, old_name: String, new_name: String },
	IAmOn(WhoInfo),
	SyncDb,
	LeaveConf { conf_no: i32 },
	Login { person_no: i32, session_no: i32 },
	RejectedConnection,
	SendMessage { recipient: i32, sender: i32, message: String },
	Logout { person_no: i32, session_no: i32 },
	DeletedText { text_no: i32, text_stat: TextStat },
	NewText { text_no: i32, text_stat: TextStat },
	NewRecipient { text_no: i32, conf_no: i32, kind: i32 },
	SubRecipient { text_no: i32, conf_no: i32, kind: i32 },
	NewMembership { person_no: i32, conf_no: i32 },
	NewUserArea { person_no: i32, old_user_area: i32, new_user_area: i32 },
	NewPresentation { conf_no: i32, old_presentation: i32, new_presentation: i32 },
	NewMotd { conf_no: i32, old_motd: i32, new_motd: i32 },
	TextAuxChanged { text_no: i32, deleted: Vec<AuxItem>, added: Vec<AuxItem> },
}

/// Whether `tag` is one of the known async message tags, i.e. one a caller
/// may legally ask to be notified about via an async handler registration.
/// Kept in sync with [`AsyncMessage::decode_tagged`] by construction: every
/// constant above appears in exactly one arm here and one arm there.
pub fn is_known_async_tag(tag: i32) -> bool {
	matches!(
		tag,
		ASYNC_NEW_TEXT_OLD
			| ASYNC_NEW_NAME
			| ASYNC_I_AM_ON
			| ASYNC_SYNC_DB
			| ASYNC_LEAVE_CONF
			| ASYNC_LOGIN
			| ASYNC_REJECTED_CONNECTION
			| ASYNC_SEND_MESSAGE
			| ASYNC_LOGOUT
			| ASYNC_DELETED_TEXT
			| ASYNC_NEW_TEXT
			| ASYNC_NEW_RECIPIENT
			| ASYNC_SUB_RECIPIENT
			| ASYNC_NEW_MEMBERSHIP
			| ASYNC_NEW_USER_AREA
			| ASYNC_NEW_PRESENTATION
			| ASYNC_NEW_MOTD
			| ASYNC_TEXT_AUX_CHANGED
	)
}

impl AsyncMessage {
	/// The tag this variant was (or would be) sent under.
	pub fn tag(&self) -> i32 {
		match self {
			Self::NewTextOld { .. } => ASYNC_NEW_TEXT_OLD,
			Self::NewName { .. } => ASYNC_NEW_NAME,
			Self::IAmOn(_) => ASYNC_I_AM_ON,
			Self::SyncDb => ASYNC_SYNC_DB,
			Self::LeaveConf { .. } => ASYNC_LEAVE_CONF,
			Self::Login { .. } => ASYNC_LOGIN,
			Self::RejectedConnection => ASYNC_REJECTED_CONNECTION,
			Self::SendMessage { .. } => ASYNC_SEND_MESSAGE,
			Self::Logout { .. } => ASYNC_LOGOUT,
			Self::DeletedText { .. } => ASYNC_DELETED_TEXT,
			Self::NewText { .. } => ASYNC_NEW_TEXT,
			Self::NewRecipient { .. } => ASYNC_NEW_RECIPIENT,
			Self::SubRecipient { .. } => ASYNC_SUB_RECIPIENT,
			Self::NewMembership { .. } => ASYNC_NEW_MEMBERSHIP,
			Self::NewUserArea { .. } => ASYNC_NEW_USER_AREA,
			Self::NewPresentation { .. } => ASYNC_NEW_PRESENTATION,
			Self::NewMotd { .. } => ASYNC_NEW_MOTD,
			Self::TextAuxChanged { .. } => ASYNC_TEXT_AUX_CHANGED,
		}
	}

	/// Decodes the argument list following `:<nargs> <tag>` for a known
	/// `tag`. Returns `None` for a tag this client has no parser for, the
	/// caller's cue to log and drop it rather than treat it as a local
	/// protocol error.
	pub fn decode_tagged<R: Read>(tag: i32, r: &mut Reader<R>) -> WireResult<Option<Self>> {
		Ok(Some(match tag {
			ASYNC_NEW_TEXT_OLD => {
				let text_no = r.read_int()?;
				let text_stat = TextStat::decode_with_format(r, true)?;
				Self::NewTextOld { text_no, text_stat }
			}
			ASYNC_NEW_NAME => Self::NewName {
				conf_no: r.read_int()?,
				old_name: String::decode(r)?,
				new_name: String::decode(r)?,
			},
			ASYNC_I_AM_ON => Self::IAmOn(WhoInfo::decode(r)?),
			ASYNC_SYNC_DB => Self::SyncDb,
			ASYNC_LEAVE_CONF => Self::LeaveConf { conf_no: r.read_int()? },
			ASYNC_LOGIN => Self::Login { person_no: r.read_int()?, session_no: r.read_int()? },
			ASYNC_REJECTED_CONNECTION => Self::RejectedConnection,
			ASYNC_SEND_MESSAGE => Self::SendMessage {
				recipient: r.read_int()?,
				sender: r.read_int()?,
				message: String::decode(r)?,
			},
			ASYNC_LOGOUT => Self::Logout { person_no: r.read_int()?, session_no: r.read_int()? },
			ASYNC_DELETED_TEXT => {
				let text_no = r.read_int()?;
				Self::DeletedText { text_no, text_stat: TextStat::decode(r)? }
			}
			ASYNC_NEW_TEXT => {
				let text_no = r.read_int()?;
				Self::NewText { text_no, text_stat: TextStat::decode(r)? }
			}
			ASYNC_NEW_RECIPIENT => Self::NewRecipient {
				text_no: r.read_int()?,
				conf_no: r.read_int()?,
				kind: r.read_int()?,
			},
			ASYNC_SUB_RECIPIENT => Self::SubRecipient {
				text_no: r.read_int()?,
				conf_no: r.read_int()?,
				kind: r.read_int()?,
			},
			ASYNC_NEW_MEMBERSHIP => Self::NewMembership { person_no: r.read_int()?, conf_no: r.read_int()? },
			ASYNC_NEW_USER_AREA => Self::NewUserArea {
				person_no: r.read_int()?,
				old_user_area: r.read_int()?,
				new_user_area: r.read_int()?,
			},
			ASYNC_NEW_PRESENTATION => Self::NewPresentation {
				conf_no: r.read_int()?,
				old_presentation: r.read_int()?,
				new_presentation: r.read_int()?,
			},
			ASYNC_NEW_MOTD => {
				Self::NewMotd { conf_no: r.read_int()?, old_motd: r.read_int()?, new_motd: r.read_int()? }
			}
			ASYNC_TEXT_AUX_CHANGED => Self::TextAuxChanged {
				text_no: r.read_int()?,
				deleted: r.read_array(AuxItem::decode)?,
				added: r.read_array(AuxItem::decode)?,
			},
			_ => return Ok(None),
		}))
	}
}
