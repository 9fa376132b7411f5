// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A [`CachedConnection`] specialized to one logged-in person: a membership
//! cache and a per-conference unread-count cache, both kept current
//! incrementally by async handlers layered on top of the base object
//! cache's.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::async_message::{
	AsyncMessage, ASYNC_DELETED_TEXT, ASYNC_LEAVE_CONF, ASYNC_NEW_MEMBERSHIP, ASYNC_NEW_RECIPIENT, ASYNC_NEW_TEXT,
	ASYNC_SUB_RECIPIENT,
};
use crate::cache::{Cache, CachedConnection};
use crate::connection::Connection;
use crate::error::Result;
use crate::flags::MembershipType;
use crate::ids::{ConfNo, PersNo};
use crate::membership::Membership11;
use crate::error::Error;
use crate::request::{ReqGetMembership, ReqLocalToGlobal, ReqQueryReadTexts};
use crate::unread::{read_ranges_to_gaps_and_last, text_in_read_ranges};

/// `get-membership`'s `no_of_confs`, set large enough to return the whole
/// list in one call, matching the reference client.
const ALL_MEMBERSHIPS: i32 = 10000;
const MAX_TEXTS_PER_CALL: i32 = 255;

#[derive(Default)]
struct UserCacheState {
	/// `None` until [`CachedUserConnection::set_user`] is called. Async
	/// handlers are registered once at construction time, before any user is
	/// known, so they read this cell rather than closing over a fixed value.
	user_no: Option<i32>,
	/// The active (non-passive) conferences this user belongs to, in the
	/// order `get-membership` returned them. `None` until first fetched.
	member_confs: Option<Vec<i32>>,
	memberships: Cache<Membership11>,
	no_unread: Cache<usize>,
}

/// `(hits, misses)` for the membership and unread-count caches.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserCacheReport {
	pub memberships: (u64, u64),
	pub no_unread: (u64, u64),
}

/// A [`CachedConnection`] bound to one logged-in person. Dereferences to
/// [`CachedConnection`] for the conference/person/text accessors it already
/// provides.
pub struct CachedUserConnection {
	inner: CachedConnection,
	state: Rc<RefCell<UserCacheState>>,
}

impl CachedUserConnection {
	pub fn new(conn: Connection) -> Self {
		let mut inner = CachedConnection::new(conn);
		let state = Rc::new(RefCell::new(UserCacheState::default()));
		install_handlers(inner.connection_mut(), state.clone());
		Self { inner, state }
	}

	/// Binds this cache to `person_no`, clearing any membership state left
	/// over from a previous user and eagerly loading `member_confs`. Call
	/// this once, right after login.
	pub fn set_user(&mut self, person_no: PersNo) -> Result<()> {
		{
			let mut st = self.state.borrow_mut();
			st.user_no = Some(person_no.0);
			st.member_confs = None;
			st.memberships = Cache::new();
			st.no_unread = Cache::new();
		}
		self.member_confs()?;
		Ok(())
	}

	pub fn user_no(&self) -> Option<i32> {
		self.state.borrow().user_no
	}

	/// The active (non-passive) conferences this user is a member of,
	/// fetching and caching the whole membership list on first call.
	pub fn member_confs(&mut self) -> Result<Vec<i32>> {
		if let Some(confs) = self.state.borrow().member_confs.clone() {
			return Ok(confs);
		}
		let person_no = self.require_user();
		let confs = fetch_member_confs(self.inner.connection_mut(), person_no)?;
		self.state.borrow_mut().member_confs = Some(confs.clone());
		Ok(confs)
	}

	/// The cached `query-read-texts` membership record for `conf_no`.
	pub fn membership(&mut self, conf_no: i32) -> Result<Membership11> {
		if let Some(m) = self.state.borrow_mut().memberships.peek(conf_no) {
			return Ok(m);
		}
		let person_no = self.require_user();
		let m = fetch_membership(self.inner.connection_mut(), person_no, conf_no)?;
		self.state.borrow_mut().memberships.set(conf_no, m.clone());
		Ok(m)
	}

	/// Whether local text number `local_no` in `conf_no` is unread, per the
	/// cached membership's read ranges.
	pub fn is_unread(&mut self, conf_no: i32, local_no: i32) -> Result<bool> {
		let membership = self.membership(conf_no)?;
		Ok(!text_in_read_ranges(local_no, &membership.read_ranges))
	}

	/// The number of unread texts in `conf_no`, maintained incrementally by
	/// async handlers once populated; recomputed in full on a cache miss.
	pub fn no_unread(&mut self, conf_no: i32) -> Result<usize> {
		if let Some(n) = self.state.borrow_mut().no_unread.peek(conf_no) {
			return Ok(n);
		}
		let person_no = self.require_user();
		self.state.borrow_mut().memberships.invalidate(conf_no);
		let n = fetch_unread_count(self.inner.connection_mut(), person_no, conf_no, &self.state)?;
		self.state.borrow_mut().no_unread.set(conf_no, n);
		Ok(n)
	}

	/// The global text numbers of every unread text in `conf_no`, forcing a
	/// fresh membership fetch first (mirroring the reference client's
	/// `get_unread_texts`, which never trusts a stale membership for this).
	pub fn unread_texts(&mut self, conf_no: i32) -> Result<Vec<i32>> {
		self.state.borrow_mut().memberships.invalidate(conf_no);
		let membership = self.membership(conf_no)?;
		unread_texts_via_gaps(self.inner.connection_mut(), ConfNo(conf_no), &membership)
	}

	pub fn report(&self) -> UserCacheReport {
		let st = self.state.borrow();
		UserCacheReport { memberships: st.memberships.report(), no_unread: st.no_unread.report() }
	}

	fn require_user(&self) -> i32 {
		self.state.borrow().user_no.expect("CachedUserConnection::set_user must be called before use")
	}
}

impl Deref for CachedUserConnection {
	type Target = CachedConnection;
	fn deref(&self) -> &CachedConnection {
		&self.inner
	}
}

impl DerefMut for CachedUserConnection {
	fn deref_mut(&mut self) -> &mut CachedConnection {
		&mut self.inner
	}
}

fn fetch_member_confs(conn: &mut Connection, person_no: i32) -> Result<Vec<i32>> {
	let memberships = conn.call(ReqGetMembership {
		person_no: PersNo(person_no),
		first: 0,
		no_of_confs: ALL_MEMBERSHIPS,
		want_read_ranges: 0,
		max_ranges: 0,
	})?;
	Ok(memberships.into_iter().filter(|m| !m.kind.contains(MembershipType::PASSIVE)).map(|m| m.conference.0).collect())
}

fn fetch_membership(conn: &mut Connection, person_no: i32, conf_no: i32) -> Result<Membership11> {
	conn.call(ReqQueryReadTexts::new(PersNo(person_no), ConfNo(conf_no)))
}

/// Walks the gaps a membership's read ranges leave open, plus the trailing
/// range past the last one, translating each through `local-to-global`.
/// Every text reached this way is unread by construction, so (unlike
/// [`get_unread_texts_for_person`](crate::unread::get_unread_texts_for_person))
/// no further read-range filtering is needed.
fn unread_texts_via_gaps(conn: &mut Connection, conf_no: ConfNo, membership: &Membership11) -> Result<Vec<i32>> {
	let (gaps, mut last) = read_ranges_to_gaps_and_last(&membership.read_ranges);
	let mut unread = Vec::new();

	for (mut first, mut gap_len) in gaps {
		while gap_len > 0 {
			let n = gap_len.min(MAX_TEXTS_PER_CALL);
			let mapping = conn.call(ReqLocalToGlobal { conf_no, first_local_no: first, no_of_existing_texts: n })?;
			unread.extend(mapping.pairs().into_iter().map(|(_, global)| global));
			first += n;
			gap_len -= n;
		}
	}

	loop {
		let mapping = match conn.call(ReqLocalToGlobal { conf_no, first_local_no: last, no_of_existing_texts: MAX_TEXTS_PER_CALL }) {
			Ok(m) => m,
			Err(Error::Server { code, .. }) if code.is_no_such_local_text() => break,
			Err(e) => return Err(e),
		};
		unread.extend(mapping.pairs().into_iter().map(|(_, global)| global));
		if !mapping.later_texts_exists {
			break;
		}
		last = mapping.range_end;
	}

	Ok(unread)
}

fn fetch_unread_count(
	conn: &mut Connection,
	person_no: i32,
	conf_no: i32,
	state: &Rc<RefCell<UserCacheState>>,
) -> Result<usize> {
	let membership = fetch_membership(conn, person_no, conf_no)?;
	state.borrow_mut().memberships.set(conf_no, membership.clone());
	Ok(unread_texts_via_gaps(conn, ConfNo(conf_no), &membership)?.len())
}

fn member_conf(state: &Rc<RefCell<UserCacheState>>, conf_no: i32) -> bool {
	state.borrow().member_confs.as_ref().is_some_and(|confs| confs.contains(&conf_no))
}

fn install_handlers(conn: &mut Connection, state: Rc<RefCell<UserCacheState>>) {
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_DELETED_TEXT, move |msg, _conn| {
			if let AsyncMessage::DeletedText { text_stat, .. } = msg {
				for rcpt in &text_stat.misc_info.recipient_list {
					let conf_no = rcpt.recpt.0;
					if !member_conf(&state, conf_no) {
						continue;
					}
					let was_unread = state
						.borrow_mut()
						.memberships
						.peek(conf_no)
						.is_some_and(|m| !text_in_read_ranges(rcpt.loc_no, &m.read_ranges));
					if was_unread {
						let mut st = state.borrow_mut();
						if let Some(n) = st.no_unread.peek(conf_no) {
							st.no_unread.set(conf_no, n.saturating_sub(1));
						}
					}
				}
			}
		});
	}
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_NEW_TEXT, move |msg, _conn| {
			if let AsyncMessage::NewText { text_stat, .. } = msg {
				for rcpt in &text_stat.misc_info.recipient_list {
					let conf_no = rcpt.recpt.0;
					if !member_conf(&state, conf_no) {
						continue;
					}
					let mut st = state.borrow_mut();
					if let Some(n) = st.no_unread.peek(conf_no) {
						st.no_unread.set(conf_no, n + 1);
					}
				}
			}
		});
	}
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_LEAVE_CONF, move |msg, _conn| {
			if let AsyncMessage::LeaveConf { conf_no } = msg {
				let mut st = state.borrow_mut();
				if let Some(confs) = &mut st.member_confs {
					confs.retain(|&c| c != *conf_no);
				}
				st.memberships.invalidate(*conf_no);
				st.no_unread.invalidate(*conf_no);
			}
		});
	}
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_NEW_RECIPIENT, move |msg, _conn| {
			if let AsyncMessage::NewRecipient { conf_no, .. } = msg {
				if !member_conf(&state, *conf_no) {
					return;
				}
				let mut st = state.borrow_mut();
				if let Some(n) = st.no_unread.peek(*conf_no) {
					st.no_unread.set(*conf_no, n + 1);
				}
			}
		});
	}
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_SUB_RECIPIENT, move |msg, _conn| {
			if let AsyncMessage::SubRecipient { conf_no, .. } = msg {
				if member_conf(&state, *conf_no) {
					state.borrow_mut().no_unread.invalidate(*conf_no);
				}
			}
		});
	}
	{
		let state = state.clone();
		conn.register_async_handler(ASYNC_NEW_MEMBERSHIP, move |msg, _conn| {
			if let AsyncMessage::NewMembership { person_no, conf_no } = msg {
				let is_us = state.borrow().user_no == Some(*person_no);
				if is_us {
					if let Some(confs) = &mut state.borrow_mut().member_confs {
						if !confs.contains(conf_no) {
							confs.push(*conf_no);
						}
					}
				}
			}
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::membership::ReadRange;
	use crate::time::Time;

	fn zero_time() -> Time {
		Time { seconds: 0, minutes: 0, hours: 0, day: 0, month: 0, year: 0, weekday: 0, year_day: 0, is_dst: false }
	}

	fn dummy_membership(conf_no: i32, ranges: Vec<ReadRange>) -> Membership11 {
		Membership11 {
			position: 0,
			last_time_read: zero_time(),
			conference: ConfNo(conf_no),
			priority: 0,
			read_ranges: ranges,
			added_by: 0,
			added_at: zero_time(),
			kind: MembershipType::empty(),
		}
	}

	#[test]
	fn is_unread_reads_the_cached_membership() {
		let m = dummy_membership(1, vec![ReadRange { first_read: 1, last_read: 5 }]);
		assert!(text_in_read_ranges(3, &m.read_ranges));
		assert!(!text_in_read_ranges(6, &m.read_ranges));
	}

	#[test]
	fn member_conf_checks_the_cached_list() {
		let state = Rc::new(RefCell::new(UserCacheState::default()));
		state.borrow_mut().member_confs = Some(vec![1, 2, 3]);
		assert!(member_conf(&state, 2));
		assert!(!member_conf(&state, 9));
	}
}
