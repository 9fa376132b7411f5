// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client-side engine for LysKOM Protocol A, versions 10 and 11.
//!
//! This crate multiplexes requests over one TCP connection
//! ([`connection::Connection`]), dispatches asynchronous server
//! notifications to registered handlers, decodes the protocol's record
//! types, and layers a notification-driven object cache
//! ([`cache::CachedConnection`], [`user_cache::CachedUserConnection`]) on
//! top, plus name-lookup and unread-text helpers that consume it.
//!
//! The byte-level codec itself (Hollerith strings, bitstrings, arrays) lives
//! in the companion [`lyskom_wire`] crate; this crate only knows how to turn
//! those atoms into LysKOM records and opcodes.

pub mod async_message;
pub mod aux_item;
pub mod cache;
pub mod conference;
pub mod connection;
pub mod error;
pub mod flags;
pub mod ids;
pub mod lookup;
pub mod membership;
pub mod misc_info;
pub mod person;
pub mod request;
pub mod server_info;
pub mod session;
pub mod text;
pub mod time;
pub mod unread;
pub mod user_cache;

pub use cache::{CacheReport, CachedConnection};
pub use connection::{Connection, ConnectionBuilder};
pub use error::{Error, ErrorCode, LocalError, Result};
pub use ids::{ConfNo, LocalTextNo, PersNo, SessionNo, TextNo};
pub use user_cache::{CachedUserConnection, UserCacheReport};
