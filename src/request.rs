// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The request catalog: one struct per opcode, each knowing how to write
//! its own arguments and how to read back whatever the server sends in
//! reply. Obsolete opcodes (`login-old`, `lookup-name`, `who-is-on`, and a
//! handful of others no server still speaks) are not carried forward.

use std::io::Read;

use lyskom_wire::{ArgWriter, Decode, Encode, Reader, WireResult};

use crate::aux_item::AuxItem;
use crate::conference::{Conference, ConfZInfo, UConference};
use crate::flags::{ConfType, MembershipType, PersonalFlags, PrivBits};
use crate::ids::{ConfNo, PersNo, SessionNo, TextNo};
use crate::membership::{Member, Membership10, Membership11, ReadRange};
use crate::misc_info::CookedMiscInfo;
use crate::person::Person;
use crate::server_info::{Info, StaticServerInfo, StatsDescription, Stats, VersionInfo};
use crate::session::{DynamicSessionInfo, SchedulingInfo, StaticSessionInfo};
use crate::text::{Mark, TextList, TextMapping, TextStat};
use crate::time::Time;

/// The largest text body the protocol allows in one `get-text` fetch:
/// requesting more than this back from the server has no effect since
/// nothing is ever that long.
pub const MAX_TEXT_SIZE: i32 = i32::MAX;

/// One request opcode: how to serialize its arguments and how to read back
/// its response. `encode_args` only ever appends to the argument list;
/// `Connection` owns writing the `<id> <opcode>` prefix.
pub trait Request {
	type Response;
	const OPCODE: i32;

	fn encode_args(&self, w: &mut ArgWriter);

	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response>;
}

/// A type-erased request response, the shape a pending-request table has to
/// hold since ~90 opcodes share only a couple of dozen distinct response
/// shapes, rather than reaching for `Box<dyn Any>`: every variant here is
/// something a caller can already
/// match on directly if they go through [`Connection::call_raw`] instead of
/// the generic, type-safe [`Connection::call`].
///
/// [`Connection::call`]: crate::connection::Connection::call
/// [`Connection::call_raw`]: crate::connection::Connection::call_raw
#[derive(Debug, Clone)]
pub enum ResponseValue {
	Void,
	Int(i32),
	IntList(Vec<i32>),
	Bytes(Vec<u8>),
	Marks(Vec<Mark>),
	TextList(TextList),
	Time(Time),
	Person(Person),
	ConfZInfoList(Vec<ConfZInfo>),
	VersionInfo(VersionInfo),
	UConference(UConference),
	DynamicSessionInfoList(Vec<DynamicSessionInfo>),
	StaticSessionInfo(StaticSessionInfo),
	Conference(Conference),
	TextStat(TextStat),
	Info(Info),
	Membership10(Membership10),
	Membership10List(Vec<Membership10>),
	MemberList(Vec<Member>),
	TextMapping(TextMapping),
	Membership11(Membership11),
	Membership11List(Vec<Membership11>),
	StatsDescription(StatsDescription),
	StatsList(Vec<Stats>),
	StaticServerInfo(StaticServerInfo),
	SchedulingInfo(SchedulingInfo),
}

impl From<()> for ResponseValue {
	fn from(_: ()) -> Self {
		ResponseValue::Void
	}
}

impl TryFrom<ResponseValue> for () {
	type Error = ResponseValue;
	fn try_from(v: ResponseValue) -> Result<Self, Self::Error> {
		match v {
			ResponseValue::Void => Ok(()),
			other => Err(other),
		}
	}
}

/// Generates the two-way `From`/`TryFrom` glue between one concrete
/// response type and its [`ResponseValue`] variant.
macro_rules! response_value {
	($variant:ident, $ty:ty) => {
		impl From<$ty> for ResponseValue {
			fn from(v: $ty) -> Self {
				ResponseValue::$variant(v)
			}
		}

		impl TryFrom<ResponseValue> for $ty {
			type Error = ResponseValue;
			fn try_from(v: ResponseValue) -> Result<Self, Self::Error> {
				match v {
					ResponseValue::$variant(inner) => Ok(inner),
					other => Err(other),
				}
			}
		}
	};
}

response_value!(Int, i32);
response_value!(IntList, Vec<i32>);
response_value!(Bytes, Vec<u8>);
response_value!(Marks, Vec<Mark>);
response_value!(TextList, TextList);
response_value!(Time, Time);
response_value!(Person, Person);
response_value!(ConfZInfoList, Vec<ConfZInfo>);
response_value!(VersionInfo, VersionInfo);
response_value!(UConference, UConference);
response_value!(DynamicSessionInfoList, Vec<DynamicSessionInfo>);
response_value!(StaticSessionInfo, StaticSessionInfo);
response_value!(Conference, Conference);
response_value!(TextStat, TextStat);
response_value!(Info, Info);
response_value!(Membership10, Membership10);
response_value!(Membership10List, Vec<Membership10>);
response_value!(MemberList, Vec<Member>);
response_value!(TextMapping, TextMapping);
response_value!(Membership11, Membership11);
response_value!(Membership11List, Vec<Membership11>);
response_value!(StatsDescription, StatsDescription);
response_value!(StatsList, Vec<Stats>);
response_value!(StaticServerInfo, StaticServerInfo);
response_value!(SchedulingInfo, SchedulingInfo);

/// Declares a request whose response carries no data: just a struct of
/// plain fields, each appended to the argument list in declaration order.
macro_rules! simple_request {
	($(#[$meta:meta])* $name:ident, $opcode:expr, [$($field:ident : $ty:ty),* $(,)?]) => {
		$(#[$meta])*
		#[derive(Debug, Clone)]
		pub struct $name {
			$(pub $field: $ty),*
		}

		impl Request for $name {
			type Response = ();
			const OPCODE: i32 = $opcode;

			#[allow(unused_variables)]
			fn encode_args(&self, w: &mut ArgWriter) {
				$(self.$field.encode(w);)*
			}

			fn decode_response<R: Read>(_r: &mut Reader<R>) -> WireResult<Self::Response> {
				Ok(())
			}
		}
	};
}

simple_request!(
	/// `logout` (opcode 1).
	ReqLogout, 1, []
);
simple_request!(
	/// `change-conference` (opcode 2).
	ReqChangeConference, 2, [conf_no: ConfNo]
);
simple_request!(
	/// `change-name` (opcode 3).
	ReqChangeName, 3, [conf_no: ConfNo, new_name: String]
);
simple_request!(
	/// `change-what-i-am-doing` (opcode 4).
	ReqChangeWhatIAmDoing, 4, [what: String]
);
simple_request!(
	/// `set-priv-bits` (opcode 7).
	ReqSetPrivBits, 7, [person_no: PersNo, privileges: PrivBits]
);
simple_request!(
	/// `set-passwd` (opcode 8).
	ReqSetPasswd, 8, [person_no: PersNo, old_pwd: String, new_pwd: String]
);
simple_request!(
	/// `delete-conf` (opcode 11).
	ReqDeleteConf, 11, [conf_no: ConfNo]
);
simple_request!(
	/// `sub-member` (opcode 15).
	ReqSubMember, 15, [conf_no: ConfNo, person_no: PersNo]
);
simple_request!(
	/// `set-presentation` (opcode 16).
	ReqSetPresentation, 16, [conf_no: ConfNo, text_no: TextNo]
);
simple_request!(
	/// `set-etc-motd` (opcode 17).
	ReqSetEtcMotd, 17, [conf_no: ConfNo, text_no: TextNo]
);
simple_request!(
	/// `set-supervisor` (opcode 18).
	ReqSetSupervisor, 18, [conf_no: ConfNo, admin: ConfNo]
);
simple_request!(
	/// `set-permitted-submitters` (opcode 19).
	ReqSetPermittedSubmitters, 19, [conf_no: ConfNo, perm_sub: ConfNo]
);
simple_request!(
	/// `set-super-conf` (opcode 20).
	ReqSetSuperConf, 20, [conf_no: ConfNo, super_conf: ConfNo]
);
simple_request!(
	/// `set-conf-type` (opcode 21).
	ReqSetConfType, 21, [conf_no: ConfNo, kind: ConfType]
);
simple_request!(
	/// `set-garb-nice` (opcode 22).
	ReqSetGarbNice, 22, [conf_no: ConfNo, nice: i32]
);
simple_request!(
	/// `mark-as-read` (opcode 27).
	ReqMarkAsRead, 27, [conf_no: ConfNo, texts: Vec<i32>]
);
simple_request!(
	/// `delete-text` (opcode 29).
	ReqDeleteText, 29, [text_no: TextNo]
);
simple_request!(
	/// `add-recipient` (opcode 30).
	ReqAddRecipient, 30, [text_no: TextNo, conf_no: ConfNo, recpt_type: i32]
);
simple_request!(
	/// `sub-recipient` (opcode 31).
	ReqSubRecipient, 31, [text_no: TextNo, conf_no: ConfNo]
);
simple_request!(
	/// `add-comment` (opcode 32).
	ReqAddComment, 32, [text_no: TextNo, comment_to: TextNo]
);
simple_request!(
	/// `sub-comment` (opcode 33).
	ReqSubComment, 33, [text_no: TextNo, comment_to: TextNo]
);
simple_request!(
	/// `add-footnote` (opcode 37).
	ReqAddFootnote, 37, [text_no: TextNo, footnote_to: TextNo]
);
simple_request!(
	/// `sub-footnote` (opcode 38).
	ReqSubFootnote, 38, [text_no: TextNo, footnote_to: TextNo]
);
simple_request!(
	/// `set-unread` (opcode 40).
	ReqSetUnread, 40, [conf_no: ConfNo, no_of_unread: i32]
);
simple_request!(
	/// `set-motd-of-lyskom` (opcode 41).
	ReqSetMotdOfLyskom, 41, [text_no: TextNo]
);
simple_request!(
	/// `enable` (opcode 42).
	ReqEnable, 42, [level: i32]
);
simple_request!(
	/// `sync-kom` (opcode 43).
	ReqSyncKom, 43, []
);
simple_request!(
	/// `shutdown-kom` (opcode 44).
	ReqShutdownKom, 44, [exit_val: i32]
);
simple_request!(
	/// `send-message` (opcode 53).
	ReqSendMessage, 53, [conf_no: ConfNo, message: String]
);
simple_request!(
	/// `disconnect` (opcode 55).
	ReqDisconnect, 55, [session_no: SessionNo]
);
simple_request!(
	/// `set-user-area` (opcode 57).
	ReqSetUserArea, 57, [person_no: PersNo, user_area: TextNo]
);
simple_request!(
	/// `login` (opcode 62). Superseded `login-old` (opcode 0), never
	/// implemented here since no server still speaks it.
	ReqLogin, 62, [person_no: PersNo, password: String, invisible: i32]
);
simple_request!(
	/// `set-client-version` (opcode 69).
	ReqSetClientVersion, 69, [client_name: String, client_version: String]
);
simple_request!(
	/// `mark-text` (opcode 72).
	ReqMarkText, 72, [text_no: TextNo, mark_type: i32]
);
simple_request!(
	/// `unmark-text` (opcode 73).
	ReqUnmarkText, 73, [text_no: TextNo]
);
simple_request!(
	/// `set-last-read` (opcode 77).
	ReqSetLastRead, 77, [conf_no: ConfNo, last_read: i32]
);
simple_request!(
	/// `accept-async` (opcode 80).
	ReqAcceptAsync, 80, [request_list: Vec<i32>]
);
simple_request!(
	/// `user-active` (opcode 82).
	ReqUserActive, 82, []
);
simple_request!(
	/// `modify-text-info` (opcode 92).
	ReqModifyTextInfo, 92, [text_no: TextNo, delete: Vec<i32>, add: Vec<AuxItem>]
);
simple_request!(
	/// `modify-conf-info` (opcode 93).
	ReqModifyConfInfo, 93, [conf_no: ConfNo, delete: Vec<i32>, add: Vec<AuxItem>]
);
simple_request!(
	/// `modify-system-info` (opcode 95).
	ReqModifySystemInfo, 95, [delete: Vec<i32>, add: Vec<AuxItem>]
);
simple_request!(
	/// `set-expire` (opcode 97).
	ReqSetExpire, 97, [conf_no: ConfNo, expire: i32]
);
simple_request!(
	/// `add-member` (opcode 100).
	ReqAddMember, 100, [conf_no: ConfNo, person_no: PersNo, priority: i32, where_: i32, kind: MembershipType]
);
simple_request!(
	/// `set-membership-type` (opcode 102).
	ReqSetMembershipType, 102, [person_no: PersNo, conf_no: ConfNo, kind: MembershipType]
);
simple_request!(
	/// `set-keep-commented` (opcode 105).
	ReqSetKeepCommented, 105, [conf_no: ConfNo, keep_commented: i32]
);
simple_request!(
	/// `set-pers-flags` (opcode 106).
	ReqSetPersFlags, 106, [person_no: PersNo, flags: PersonalFlags]
);
simple_request!(
	/// `mark-as-unread` (opcode 109).
	ReqMarkAsUnread, 109, [conf_no: ConfNo, text_no: TextNo]
);
simple_request!(
	/// `set-read-ranges` (opcode 110).
	ReqSetReadRanges, 110, [conf_no: ConfNo, read_ranges: Vec<ReadRange>]
);
simple_request!(
	/// `set-scheduling` (opcode 119).
	ReqSetScheduling, 119, [session_no: SessionNo, priority: i32, weight: i32]
);
simple_request!(
	/// `set-connection-time-format` (opcode 120).
	ReqSetConnectionTimeFormat, 120, [use_utc: i32]
);

// --- Requests with a non-void response, or with argument encoding the
// simple_request! macro can't express, hand-written one at a time below. ---

/// `get-marks` (opcode 23).
#[derive(Debug, Clone)]
pub struct ReqGetMarks;

impl Request for ReqGetMarks {
	type Response = Vec<Mark>;
	const OPCODE: i32 = 23;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_array(Mark::decode)
	}
}

/// `get-text` (opcode 25). Returns raw bytes rather than a decoded
/// `String`: which charset those bytes are depends on the conference's
/// negotiated text encoding, which this type doesn't track.
#[derive(Debug, Clone)]
pub struct ReqGetText {
	pub text_no: TextNo,
	pub start_char: i32,
	pub end_char: i32,
}

impl ReqGetText {
	pub fn whole_text(text_no: TextNo) -> Self {
		Self { text_no, start_char: 0, end_char: MAX_TEXT_SIZE }
	}
}

impl Request for ReqGetText {
	type Response = Vec<u8>;
	const OPCODE: i32 = 25;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.text_no.encode(w);
		w.int(self.start_char).int(self.end_char);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_hollerith()
	}
}

/// `get-map` (opcode 34), superseded by `local-to-global` (103) but still
/// useful against protocol-10 servers.
#[derive(Debug, Clone)]
pub struct ReqGetMap {
	pub conf_no: ConfNo,
	pub first_local_no: i32,
	pub no_of_texts: i32,
}

impl Request for ReqGetMap {
	type Response = TextList;
	const OPCODE: i32 = 34;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.conf_no.encode(w);
		w.int(self.first_local_no).int(self.no_of_texts);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		TextList::decode(r)
	}
}

/// `get-time` (opcode 35).
#[derive(Debug, Clone)]
pub struct ReqGetTime;

impl Request for ReqGetTime {
	type Response = Time;
	const OPCODE: i32 = 35;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		Time::decode(r)
	}
}

/// `get-person-stat` (opcode 49).
#[derive(Debug, Clone)]
pub struct ReqGetPersonStat {
	pub person_no: PersNo,
}

impl Request for ReqGetPersonStat {
	type Response = Person;
	const OPCODE: i32 = 49;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.person_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		Person::decode(r)
	}
}

/// `get-unread-confs` (opcode 52).
#[derive(Debug, Clone)]
pub struct ReqGetUnreadConfs {
	pub person_no: PersNo,
}

impl Request for ReqGetUnreadConfs {
	type Response = Vec<i32>;
	const OPCODE: i32 = 52;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.person_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		Vec::decode(r)
	}
}

/// `who-am-i` (opcode 56).
#[derive(Debug, Clone)]
pub struct ReqWhoAmI;

impl Request for ReqWhoAmI {
	type Response = i32;
	const OPCODE: i32 = 56;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `get-last-text` (opcode 58): the most recent text created strictly
/// before `before`.
#[derive(Debug, Clone)]
pub struct ReqGetLastText {
	pub before: Time,
}

impl Request for ReqGetLastText {
	type Response = i32;
	const OPCODE: i32 = 58;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.before.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `find-next-text-no` (opcode 60).
#[derive(Debug, Clone)]
pub struct ReqFindNextTextNo {
	pub start: TextNo,
}

impl Request for ReqFindNextTextNo {
	type Response = i32;
	const OPCODE: i32 = 60;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.start.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `find-previous-text-no` (opcode 61).
#[derive(Debug, Clone)]
pub struct ReqFindPreviousTextNo {
	pub start: TextNo,
}

impl Request for ReqFindPreviousTextNo {
	type Response = i32;
	const OPCODE: i32 = 61;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.start.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `get-client-name` (opcode 70).
#[derive(Debug, Clone)]
pub struct ReqGetClientName {
	pub session_no: SessionNo,
}

impl Request for ReqGetClientName {
	type Response = Vec<u8>;
	const OPCODE: i32 = 70;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.session_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_hollerith()
	}
}

/// `get-client-version` (opcode 71).
#[derive(Debug, Clone)]
pub struct ReqGetClientVersion {
	pub session_no: SessionNo,
}

impl Request for ReqGetClientVersion {
	type Response = Vec<u8>;
	const OPCODE: i32 = 71;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.session_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_hollerith()
	}
}

/// `re-z-lookup` (opcode 74): a regexp-based name lookup, the workhorse
/// under [`crate::lookup::regexp_lookup`].
#[derive(Debug, Clone)]
pub struct ReqReZLookup {
	pub regexp: String,
	pub want_pers: i32,
	pub want_confs: i32,
}

impl Request for ReqReZLookup {
	type Response = Vec<ConfZInfo>;
	const OPCODE: i32 = 74;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.regexp.encode(w);
		w.int(self.want_pers).int(self.want_confs);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_array(ConfZInfo::decode)
	}
}

/// `get-version-info` (opcode 75).
#[derive(Debug, Clone)]
pub struct ReqGetVersionInfo;

impl Request for ReqGetVersionInfo {
	type Response = VersionInfo;
	const OPCODE: i32 = 75;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		VersionInfo::decode(r)
	}
}

/// `lookup-z-name` (opcode 76): an exact/prefix name lookup, the workhorse
/// under [`crate::lookup::lookup_name`].
#[derive(Debug, Clone)]
pub struct ReqLookupZName {
	pub name: String,
	pub want_pers: i32,
	pub want_confs: i32,
}

impl Request for ReqLookupZName {
	type Response = Vec<ConfZInfo>;
	const OPCODE: i32 = 76;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.name.encode(w);
		w.int(self.want_pers).int(self.want_confs);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_array(ConfZInfo::decode)
	}
}

/// `get-uconf-stat` (opcode 78).
#[derive(Debug, Clone)]
pub struct ReqGetUconfStat {
	pub conf_no: ConfNo,
}

impl Request for ReqGetUconfStat {
	type Response = UConference;
	const OPCODE: i32 = 78;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.conf_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		UConference::decode(r)
	}
}

/// `set-info` (opcode 79). Sends the `Info-Old` shape: no `aux_item_list`.
#[derive(Debug, Clone)]
pub struct ReqSetInfo {
	pub info: Info,
}

impl Request for ReqSetInfo {
	type Response = ();
	const OPCODE: i32 = 79;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.info.encode_old(w);
	}
	fn decode_response<R: Read>(_r: &mut Reader<R>) -> WireResult<Self::Response> {
		Ok(())
	}
}

/// `query-async` (opcode 81).
#[derive(Debug, Clone)]
pub struct ReqQueryAsync;

impl Request for ReqQueryAsync {
	type Response = Vec<i32>;
	const OPCODE: i32 = 81;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		Vec::decode(r)
	}
}

/// `who-is-on-dynamic` (opcode 83).
#[derive(Debug, Clone)]
pub struct ReqWhoIsOnDynamic {
	pub want_visible: i32,
	pub want_invisible: i32,
	pub active_last: i32,
}

impl Default for ReqWhoIsOnDynamic {
	fn default() -> Self {
		Self { want_visible: 1, want_invisible: 0, active_last: 0 }
	}
}

impl Request for ReqWhoIsOnDynamic {
	type Response = Vec<DynamicSessionInfo>;
	const OPCODE: i32 = 83;
	fn encode_args(&self, w: &mut ArgWriter) {
		w.int(self.want_visible).int(self.want_invisible).int(self.active_last);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_array(DynamicSessionInfo::decode)
	}
}

/// `get-static-session-info` (opcode 84).
#[derive(Debug, Clone)]
pub struct ReqGetStaticSessionInfo {
	pub session_no: SessionNo,
}

impl Request for ReqGetStaticSessionInfo {
	type Response = StaticSessionInfo;
	const OPCODE: i32 = 84;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.session_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		StaticSessionInfo::decode(r)
	}
}

/// `get-collate-table` (opcode 85): the server's collation table, consumed
/// by [`crate::lookup`] for case-insensitive name matching.
#[derive(Debug, Clone)]
pub struct ReqGetCollateTable;

impl Request for ReqGetCollateTable {
	type Response = Vec<u8>;
	const OPCODE: i32 = 85;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_hollerith()
	}
}

/// `create-text` (opcode 86). `text` is already encoded to whatever charset
/// the caller chose; this type never assumes Latin-1.
#[derive(Debug, Clone)]
pub struct ReqCreateText {
	pub text: Vec<u8>,
	pub misc_info: CookedMiscInfo,
	pub aux_items: Vec<AuxItem>,
}

impl Request for ReqCreateText {
	type Response = i32;
	const OPCODE: i32 = 86;
	fn encode_args(&self, w: &mut ArgWriter) {
		w.hollerith(&self.text);
		self.misc_info.encode(w);
		self.aux_items.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `create-anonymous-text` (opcode 87).
#[derive(Debug, Clone)]
pub struct ReqCreateAnonymousText {
	pub text: Vec<u8>,
	pub misc_info: CookedMiscInfo,
	pub aux_items: Vec<AuxItem>,
}

impl Request for ReqCreateAnonymousText {
	type Response = i32;
	const OPCODE: i32 = 87;
	fn encode_args(&self, w: &mut ArgWriter) {
		w.hollerith(&self.text);
		self.misc_info.encode(w);
		self.aux_items.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `create-conf` (opcode 88).
#[derive(Debug, Clone)]
pub struct ReqCreateConf {
	pub name: String,
	pub kind: ConfType,
	pub aux_items: Vec<AuxItem>,
}

impl Request for ReqCreateConf {
	type Response = i32;
	const OPCODE: i32 = 88;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.name.encode(w);
		self.kind.encode(w);
		self.aux_items.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `create-person` (opcode 89).
#[derive(Debug, Clone)]
pub struct ReqCreatePerson {
	pub name: String,
	pub passwd: String,
	pub flags: PersonalFlags,
	pub aux_items: Vec<AuxItem>,
}

impl Request for ReqCreatePerson {
	type Response = i32;
	const OPCODE: i32 = 89;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.name.encode(w);
		self.passwd.encode(w);
		self.flags.encode(w);
		self.aux_items.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `get-text-stat` (opcode 90).
#[derive(Debug, Clone)]
pub struct ReqGetTextStat {
	pub text_no: TextNo,
}

impl Request for ReqGetTextStat {
	type Response = TextStat;
	const OPCODE: i32 = 90;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.text_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		TextStat::decode(r)
	}
}

/// `get-conf-stat` (opcode 91).
#[derive(Debug, Clone)]
pub struct ReqGetConfStat {
	pub conf_no: ConfNo,
}

impl Request for ReqGetConfStat {
	type Response = Conference;
	const OPCODE: i32 = 91;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.conf_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		Conference::decode(r)
	}
}

/// `get-info` (opcode 94).
#[derive(Debug, Clone)]
pub struct ReqGetInfo;

impl Request for ReqGetInfo {
	type Response = Info;
	const OPCODE: i32 = 94;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		Info::decode(r)
	}
}

/// `query-predefined-aux-items` (opcode 96).
#[derive(Debug, Clone)]
pub struct ReqQueryPredefinedAuxItems;

impl Request for ReqQueryPredefinedAuxItems {
	type Response = Vec<i32>;
	const OPCODE: i32 = 96;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		Vec::decode(r)
	}
}

/// `query-read-texts-10` (opcode 98), obsoleted by `query-read-texts` (107)
/// but still needed against a protocol-10 server.
#[derive(Debug, Clone)]
pub struct ReqQueryReadTexts10 {
	pub person_no: PersNo,
	pub conf_no: ConfNo,
}

impl Request for ReqQueryReadTexts10 {
	type Response = Membership10;
	const OPCODE: i32 = 98;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.person_no.encode(w);
		self.conf_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		Membership10::decode(r)
	}
}

/// `get-membership-10` (opcode 99).
#[derive(Debug, Clone)]
pub struct ReqGetMembership10 {
	pub person_no: PersNo,
	pub first: i32,
	pub no_of_confs: i32,
	pub want_read_texts: i32,
}

impl Request for ReqGetMembership10 {
	type Response = Vec<Membership10>;
	const OPCODE: i32 = 99;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.person_no.encode(w);
		w.int(self.first).int(self.no_of_confs).int(self.want_read_texts);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_array(Membership10::decode)
	}
}

/// `get-members` (opcode 101).
#[derive(Debug, Clone)]
pub struct ReqGetMembers {
	pub conf_no: ConfNo,
	pub first: i32,
	pub no_of_members: i32,
}

impl Request for ReqGetMembers {
	type Response = Vec<Member>;
	const OPCODE: i32 = 101;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.conf_no.encode(w);
		w.int(self.first).int(self.no_of_members);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_array(Member::decode)
	}
}

/// `local-to-global` (opcode 103).
#[derive(Debug, Clone)]
pub struct ReqLocalToGlobal {
	pub conf_no: ConfNo,
	pub first_local_no: i32,
	pub no_of_existing_texts: i32,
}

impl Request for ReqLocalToGlobal {
	type Response = TextMapping;
	const OPCODE: i32 = 103;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.conf_no.encode(w);
		w.int(self.first_local_no).int(self.no_of_existing_texts);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		TextMapping::decode(r)
	}
}

/// `map-created-texts` (opcode 104).
#[derive(Debug, Clone)]
pub struct ReqMapCreatedTexts {
	pub author: PersNo,
	pub first_local_no: i32,
	pub no_of_existing_texts: i32,
}

impl Request for ReqMapCreatedTexts {
	type Response = TextMapping;
	const OPCODE: i32 = 104;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.author.encode(w);
		w.int(self.first_local_no).int(self.no_of_existing_texts);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		TextMapping::decode(r)
	}
}

/// `query-read-texts` (opcode 107, protocol 11).
#[derive(Debug, Clone)]
pub struct ReqQueryReadTexts {
	pub person_no: PersNo,
	pub conf_no: ConfNo,
	pub want_read_ranges: i32,
	pub max_ranges: i32,
}

impl ReqQueryReadTexts {
	pub fn new(person_no: PersNo, conf_no: ConfNo) -> Self {
		Self { person_no, conf_no, want_read_ranges: 1, max_ranges: 0 }
	}
}

impl Request for ReqQueryReadTexts {
	type Response = Membership11;
	const OPCODE: i32 = 107;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.person_no.encode(w);
		self.conf_no.encode(w);
		w.int(self.want_read_ranges).int(self.max_ranges);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		Membership11::decode(r)
	}
}

/// `get-membership` (opcode 108, protocol 11).
#[derive(Debug, Clone)]
pub struct ReqGetMembership {
	pub person_no: PersNo,
	pub first: i32,
	pub no_of_confs: i32,
	pub want_read_ranges: i32,
	pub max_ranges: i32,
}

impl ReqGetMembership {
	pub fn new(person_no: PersNo, first: i32, no_of_confs: i32) -> Self {
		Self { person_no, first, no_of_confs, want_read_ranges: 1, max_ranges: 0 }
	}
}

impl Request for ReqGetMembership {
	type Response = Vec<Membership11>;
	const OPCODE: i32 = 108;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.person_no.encode(w);
		w.int(self.first)
			.int(self.no_of_confs)
			.int(self.want_read_ranges)
			.int(self.max_ranges);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_array(Membership11::decode)
	}
}

/// `get-stats-description` (opcode 111).
#[derive(Debug, Clone)]
pub struct ReqGetStatsDescription;

impl Request for ReqGetStatsDescription {
	type Response = StatsDescription;
	const OPCODE: i32 = 111;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		StatsDescription::decode(r)
	}
}

/// `get-stats` (opcode 112).
#[derive(Debug, Clone)]
pub struct ReqGetStats {
	pub what: String,
}

impl Request for ReqGetStats {
	type Response = Vec<Stats>;
	const OPCODE: i32 = 112;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.what.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_array(Stats::decode)
	}
}

/// `get-boottime-info` (opcode 113).
#[derive(Debug, Clone)]
pub struct ReqGetBoottimeInfo;

impl Request for ReqGetBoottimeInfo {
	type Response = StaticServerInfo;
	const OPCODE: i32 = 113;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		StaticServerInfo::decode(r)
	}
}

/// `first-unused-conf-no` (opcode 114).
#[derive(Debug, Clone)]
pub struct ReqFirstUnusedConfNo;

impl Request for ReqFirstUnusedConfNo {
	type Response = i32;
	const OPCODE: i32 = 114;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `first-unused-text-no` (opcode 115).
#[derive(Debug, Clone)]
pub struct ReqFirstUnusedTextNo;

impl Request for ReqFirstUnusedTextNo {
	type Response = i32;
	const OPCODE: i32 = 115;
	fn encode_args(&self, _w: &mut ArgWriter) {}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `find-next-conf-no` (opcode 116).
#[derive(Debug, Clone)]
pub struct ReqFindNextConfNo {
	pub conf_no: ConfNo,
}

impl Request for ReqFindNextConfNo {
	type Response = i32;
	const OPCODE: i32 = 116;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.conf_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `find-previous-conf-no` (opcode 117).
#[derive(Debug, Clone)]
pub struct ReqFindPreviousConfNo {
	pub conf_no: ConfNo,
}

impl Request for ReqFindPreviousConfNo {
	type Response = i32;
	const OPCODE: i32 = 117;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.conf_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		r.read_int()
	}
}

/// `get-scheduling` (opcode 118).
#[derive(Debug, Clone)]
pub struct ReqGetScheduling {
	pub session_no: SessionNo,
}

impl Request for ReqGetScheduling {
	type Response = SchedulingInfo;
	const OPCODE: i32 = 118;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.session_no.encode(w);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		SchedulingInfo::decode(r)
	}
}

/// `local-to-global-reverse` (opcode 121).
#[derive(Debug, Clone)]
pub struct ReqLocalToGlobalReverse {
	pub conf_no: ConfNo,
	pub local_no_ceiling: i32,
	pub no_of_existing_texts: i32,
}

impl Request for ReqLocalToGlobalReverse {
	type Response = TextMapping;
	const OPCODE: i32 = 121;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.conf_no.encode(w);
		w.int(self.local_no_ceiling).int(self.no_of_existing_texts);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		TextMapping::decode(r)
	}
}

/// `map-created-texts-reverse` (opcode 122).
#[derive(Debug, Clone)]
pub struct ReqMapCreatedTextsReverse {
	pub author: PersNo,
	pub local_no_ceiling: i32,
	pub no_of_existing_texts: i32,
}

impl Request for ReqMapCreatedTextsReverse {
	type Response = TextMapping;
	const OPCODE: i32 = 122;
	fn encode_args(&self, w: &mut ArgWriter) {
		self.author.encode(w);
		w.int(self.local_no_ceiling).int(self.no_of_existing_texts);
	}
	fn decode_response<R: Read>(r: &mut Reader<R>) -> WireResult<Self::Response> {
		TextMapping::decode(r)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn login_encodes_hollerith_length_as_byte_count_not_char_count() {
		// "björn" is 5 ISO-8859-1 bytes (ö is one byte, 0xF6) even though
		// the same text is 6 bytes as UTF-8; the Hollerith length on the
		// wire must be the declared encoding's byte count, 5.
		let req = ReqLogin { person_no: PersNo(7), password: "björn".to_string(), invisible: 0 };
		assert_eq!("björn".len(), 6, "sanity check: the Rust string is 6 UTF-8 bytes");

		let mut w = ArgWriter::new();
		req.encode_args(&mut w);
		let bytes = w.into_bytes();
		let text = lyskom_wire::latin1_to_string(&bytes);
		assert_eq!(text, "7 5Hbjörn 0");
	}

	#[test]
	fn change_conference_has_no_response_body() {
		let mut r = Reader::new(std::io::Cursor::new(Vec::new()));
		assert_eq!(ReqChangeConference::decode_response(&mut r).unwrap(), ());
	}

	#[test]
	fn who_am_i_decodes_a_bare_integer() {
		let mut r = Reader::new(std::io::Cursor::new(b"4711".to_vec()));
		assert_eq!(ReqWhoAmI::decode_response(&mut r).unwrap(), 4711);
	}

	#[test]
	fn get_text_decodes_hollerith_bytes() {
		let mut r = Reader::new(std::io::Cursor::new(b"5Hhello".to_vec()));
		assert_eq!(ReqGetText::decode_response(&mut r).unwrap(), b"hello".to_vec());
	}
}
