// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The object cache layer: five lazily-populated caches sitting on top of a
//! [`Connection`], kept coherent by async handlers the cache installs on
//! itself at construction time.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;
use lyskom_wire::latin1_to_string;

use crate::async_message::{
	AsyncMessage, ASYNC_DELETED_TEXT, ASYNC_LEAVE_CONF, ASYNC_NEW_MEMBERSHIP, ASYNC_NEW_NAME, ASYNC_NEW_RECIPIENT,
	ASYNC_NEW_TEXT, ASYNC_SUB_RECIPIENT,
};
use crate::aux_item::{first_with_tag, AuxItemTag};
use crate::conference::{Conference, UConference};
use crate::connection::Connection;
use crate::error::Result;
use crate::ids::{ConfNo, TextNo};
use crate::person::Person;
use crate::request::{ReqGetConfStat, ReqGetPersonStat, ReqGetText, ReqGetTextStat, ReqGetUconfStat};
use crate::text::TextStat;

/// A single number-keyed cache layer with miss/hit counters, the shape all
/// five of [`CachedConnection`]'s caches share. Fetching on miss is the
/// caller's job (`peek` only ever reads); `CachedConnection`'s accessor
/// methods are what actually call through to the server.
pub struct Cache<V> {
	entries: HashMap<i32, V>,
	hits: u64,
	misses: u64,
}

impl<V> Default for Cache<V> {
	fn default() -> Self {
		Self { entries: HashMap::new(), hits: 0, misses: 0 }
	}
}

impl<V: Clone> Cache<V> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a clone of the cached value for `key`, if present, counting
	/// the lookup as a hit or a miss.
	pub fn peek(&mut self, key: i32) -> Option<V> {
		match self.entries.get(&key) {
			Some(v) => {
				self.hits += 1;
				Some(v.clone())
			}
			None => {
				self.misses += 1;
				None
			}
		}
	}

	pub fn set(&mut self, key: i32, value: V) {
		self.entries.insert(key, value);
	}

	/// Drops the entry for `key`, if any. Tolerant of a miss.
	pub fn invalidate(&mut self, key: i32) {
		self.entries.remove(&key);
	}

	/// `(hits, misses)`, for instrumentation.
	pub fn report(&self) -> (u64, u64) {
		(self.hits, self.misses)
	}
}

#[derive(Default)]
struct CacheState {
	uconferences: Cache<UConference>,
	conferences: Cache<Conference>,
	persons: Cache<Person>,
	textstats: Cache<TextStat>,
	subjects: Cache<String>,
}

/// `(hits, misses)` per cache, as returned by [`CachedConnection::report`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheReport {
	pub uconferences: (u64, u64),
	pub conferences: (u64, u64),
	pub persons: (u64, u64),
	pub textstats: (u64, u64),
	pub subjects: (u64, u64),
}

/// A [`Connection`] wrapped with five lazy object caches (uconferences,
/// conferences, persons, text stats, subjects). Async handlers installed at
/// construction time keep entries coherent as the server reports changes.
pub struct CachedConnection {
	conn: Connection,
	state: Rc<RefCell<CacheState>>,
}

impl CachedConnection {
	pub fn new(mut conn: Connection) -> Self {
		let state = Rc::new(RefCell::new(CacheState::default()));
		install_handlers(&mut conn, state.clone());
		Self { conn, state }
	}

	pub fn connection(&self) -> &Connection {
		&self.conn
	}

	pub fn connection_mut(&mut self) -> &mut Connection {
		&mut self.conn
	}

	pub fn uconference(&mut self, conf_no: i32) -> Result<UConference> {
		if let Some(v) = self.state.borrow_mut().uconferences.peek(conf_no) {
			return Ok(v);
		}
		let v = self.conn.call(ReqGetUconfStat { conf_no: ConfNo(conf_no) })?;
		self.state.borrow_mut().uconferences.set(conf_no, v.clone());
		Ok(v)
	}

	pub fn set_uconference(&mut self, conf_no: i32, value: UConference) {
		self.state.borrow_mut().uconferences.set(conf_no, value);
	}

	pub fn invalidate_uconference(&mut self, conf_no: i32) {
		self.state.borrow_mut().uconferences.invalidate(conf_no);
	}

	pub fn conference(&mut self, conf_no: i32) -> Result<Conference> {
		if let Some(v) = self.state.borrow_mut().conferences.peek(conf_no) {
			return Ok(v);
		}
		let v = self.conn.call(ReqGetConfStat { conf_no: ConfNo(conf_no) })?;
		self.state.borrow_mut().conferences.set(conf_no, v.clone());
		Ok(v)
	}

	pub fn invalidate_conference(&mut self, conf_no: i32) {
		self.state.borrow_mut().conferences.invalidate(conf_no);
	}

	pub fn person(&mut self, person_no: i32) -> Result<Person> {
		if let Some(v) = self.state.borrow_mut().persons.peek(person_no) {
			return Ok(v);
		}
		let v = self.conn.call(ReqGetPersonStat { person_no: crate::ids::PersNo(person_no) })?;
		self.state.borrow_mut().persons.set(person_no, v.clone());
		Ok(v)
	}

	pub fn invalidate_person(&mut self, person_no: i32) {
		self.state.borrow_mut().persons.invalidate(person_no);
	}

	pub fn text_stat(&mut self, text_no: i32) -> Result<TextStat> {
		if let Some(v) = self.state.borrow_mut().textstats.peek(text_no) {
			return Ok(v);
		}
		let v = self.conn.call(ReqGetTextStat { text_no: TextNo(text_no) })?;
		self.state.borrow_mut().textstats.set(text_no, v.clone());
		Ok(v)
	}

	pub fn invalidate_text_stat(&mut self, text_no: i32) {
		self.state.borrow_mut().textstats.invalidate(text_no);
	}

	/// The first 200 decoded bytes of the text, truncated at the first
	/// newline: the line callers usually want to show as a subject.
	pub fn subject(&mut self, text_no: i32) -> Result<String> {
		if let Some(v) = self.state.borrow_mut().subjects.peek(text_no) {
			return Ok(v);
		}
		let v = self.fetch_subject(text_no)?;
		self.state.borrow_mut().subjects.set(text_no, v.clone());
		Ok(v)
	}

	pub fn invalidate_subject(&mut self, text_no: i32) {
		self.state.borrow_mut().subjects.invalidate(text_no);
	}

	fn fetch_subject(&mut self, text_no: i32) -> Result<String> {
		let charset = self.text_encoding(text_no)?;
		let bytes = self.conn.call(ReqGetText { text_no: TextNo(text_no), start_char: 0, end_char: 200 })?;
		let text = decode_with_charset(&bytes, &charset);
		Ok(text.lines().next().unwrap_or("").to_string())
	}

	/// The charset the text's `content-type` aux-item names, or
	/// `ISO-8859-1` if it has none.
	pub fn text_encoding(&mut self, text_no: i32) -> Result<String> {
		let stat = self.text_stat(text_no)?;
		if let Some(item) = first_with_tag(&stat.aux_items, AuxItemTag::ContentType) {
			if let Some(charset) = parse_charset(&item.data_as_string()) {
				return Ok(charset);
			}
		}
		Ok("ISO-8859-1".to_string())
	}

	/// The conference's name, falling back to `default` (with any `%d`
	/// replaced by the conference number) if the uconference lookup fails or
	/// the name is empty.
	pub fn conf_name(&mut self, conf_no: i32, default: &str) -> String {
		match self.uconference(conf_no) {
			Ok(u) if !u.name.is_empty() => u.name,
			_ => {
				if default.contains("%d") {
					default.replace("%d", &conf_no.to_string())
				} else {
					default.to_string()
				}
			}
		}
	}

	pub fn report(&self) -> CacheReport {
		let st = self.state.borrow();
		CacheReport {
			uconferences: st.uconferences.report(),
			conferences: st.conferences.report(),
			persons: st.persons.report(),
			textstats: st.textstats.report(),
			subjects: st.subjects.report(),
		}
	}
}

/// Parses a `content-type` aux-item's data for a `charset=...` parameter,
/// the same query-string-ish convention the reference client reads.
fn parse_charset(data: &str) -> Option<String> {
	let lower = data.to_ascii_lowercase();
	let at = lower.find("charset=")?;
	let rest = &data[at + "charset=".len()..];
	let value: String =
		rest.trim_start_matches(['"', '\'']).chars().take_while(|&c| !matches!(c, ';' | '"' | '\'' | ' ' | '\t')).collect();
	if value.is_empty() {
		None
	} else {
		Some(value)
	}
}

fn decode_with_charset(bytes: &[u8], charset: &str) -> String {
	match charset.to_ascii_lowercase().as_str() {
		"utf-8" | "utf8" => String::from_utf8_lossy(bytes).into_owned(),
		_ => latin1_to_string(bytes),
	}
}

fn install_handlers(conn: &mut Connection, state: Rc<RefCell<CacheState>>) {
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_NEW_NAME, move |msg, _conn| {
			if let AsyncMessage::NewName { conf_no, .. } = msg {
				debug!("new-name: invalidating conference {}", conf_no);
				let mut st = state.borrow_mut();
				st.uconferences.invalidate(*conf_no);
				st.conferences.invalidate(*conf_no);
			}
		});
	}
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_LEAVE_CONF, move |msg, _conn| {
			if let AsyncMessage::LeaveConf { conf_no } = msg {
				state.borrow_mut().conferences.invalidate(*conf_no);
			}
		});
	}
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_DELETED_TEXT, move |msg, _conn| {
			if let AsyncMessage::DeletedText { text_stat, .. } = msg {
				let mut st = state.borrow_mut();
				for rcpt in &text_stat.misc_info.recipient_list {
					st.conferences.invalidate(rcpt.recpt.0);
				}
			}
		});
	}
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_NEW_TEXT, move |msg, _conn| {
			if let AsyncMessage::NewText { text_stat, .. } = msg {
				let mut st = state.borrow_mut();
				for rcpt in &text_stat.misc_info.recipient_list {
					st.conferences.invalidate(rcpt.recpt.0);
					st.uconferences.invalidate(rcpt.recpt.0);
				}
			}
		});
	}
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_NEW_RECIPIENT, move |msg, _conn| {
			if let AsyncMessage::NewRecipient { text_no, conf_no, .. } = msg {
				let mut st = state.borrow_mut();
				st.conferences.invalidate(*conf_no);
				st.uconferences.invalidate(*conf_no);
				st.textstats.invalidate(*text_no);
			}
		});
	}
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_SUB_RECIPIENT, move |msg, _conn| {
			if let AsyncMessage::SubRecipient { text_no, conf_no, .. } = msg {
				let mut st = state.borrow_mut();
				st.conferences.invalidate(*conf_no);
				st.textstats.invalidate(*text_no);
			}
		});
	}
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_NEW_MEMBERSHIP, move |msg, _conn| {
			if let AsyncMessage::NewMembership { conf_no, .. } = msg {
				state.borrow_mut().conferences.invalidate(*conf_no);
			}
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cache_peek_counts_hits_and_misses() {
		let mut cache: Cache<i32> = Cache::new();
		assert_eq!(cache.peek(1), None);
		cache.set(1, 42);
		assert_eq!(cache.peek(1), Some(42));
		assert_eq!(cache.report(), (1, 1));
	}

	#[test]
	fn cache_invalidate_is_tolerant_of_a_miss() {
		let mut cache: Cache<i32> = Cache::new();
		cache.invalidate(7);
		cache.set(7, 1);
		cache.invalidate(7);
		assert_eq!(cache.peek(7), None);
	}

	#[test]
	fn parse_charset_finds_quoted_and_bare_values() {
		assert_eq!(parse_charset("text/plain; charset=utf-8"), Some("utf-8".to_string()));
		assert_eq!(parse_charset(r#"text/plain; charset="ISO-8859-1""#), Some("ISO-8859-1".to_string()));
		assert_eq!(parse_charset("text/plain"), None);
	}
}
