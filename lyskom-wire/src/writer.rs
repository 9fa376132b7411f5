// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Write;

use log::trace;

use crate::error::WireResult;

/// An in-memory byte buffer that accumulates the argument list of one
/// outgoing request. Building the whole request in memory before handing it
/// to a [`Writer`] keeps the socket write a single syscall per request: one
/// fully-formed line at a time.
#[derive(Default)]
pub struct ArgWriter {
	buf: Vec<u8>,
}

impl ArgWriter {
	pub fn new() -> Self {
		Self::default()
	}

	fn sep(&mut self) {
		if !self.buf.is_empty() && *self.buf.last().unwrap() != b' ' {
			self.buf.push(b' ');
		}
	}

	pub fn int(&mut self, v: i32) -> &mut Self {
		self.sep();
		self.buf.extend_from_slice(v.to_string().as_bytes());
		self
	}

	pub fn bitstring(&mut self, bits: &[bool]) -> &mut Self {
		self.sep();
		for &bit in bits {
			self.buf.push(if bit { b'1' } else { b'0' });
		}
		self
	}

	/// Writes `bytes` as a Hollerith string: `<len>H<bytes>`.
	pub fn hollerith(&mut self, bytes: &[u8]) -> &mut Self {
		self.sep();
		self.buf.extend_from_slice(bytes.len().to_string().as_bytes());
		self.buf.push(b'H');
		self.buf.extend_from_slice(bytes);
		self
	}

	pub fn raw(&mut self, text: &str) -> &mut Self {
		self.sep();
		self.buf.extend_from_slice(text.as_bytes());
		self
	}

	/// Writes an array: `*` if empty, otherwise `<n> { elem elem ... }`.
	pub fn array<T>(&mut self, items: &[T], mut encode_elem: impl FnMut(&mut Self, &T)) -> &mut Self {
		self.sep();
		if items.is_empty() {
			self.buf.push(b'*');
			return self;
		}
		self.buf.extend_from_slice(items.len().to_string().as_bytes());
		self.buf.extend_from_slice(b" { ");
		for item in items {
			encode_elem(self, item);
			self.buf.push(b' ');
		}
		self.buf.push(b'}');
		self
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.buf
	}
}

/// A thin wrapper over any byte sink that frames and flushes one request
/// line at a time.
pub struct Writer<W> {
	inner: W,
	trace: bool,
}

impl<W: Write> Writer<W> {
	pub fn new(inner: W) -> Self {
		Self { inner, trace: false }
	}

	pub fn set_trace(&mut self, trace: bool) {
		self.trace = trace;
	}

	/// Sends `<id> <opcode>[ <args>]\n` and flushes.
	pub fn send_request(&mut self, id: i32, opcode: u32, args: &ArgWriter) -> WireResult<()> {
		let mut line = format!("{} {}", id, opcode).into_bytes();
		let arg_bytes = args.buf.as_slice();
		if !arg_bytes.is_empty() {
			line.push(b' ');
			line.extend_from_slice(arg_bytes);
		}
		line.push(b'\n');
		if self.trace {
			trace!(">>> {}", String::from_utf8_lossy(&line).trim_end());
		}
		self.inner.write_all(&line)?;
		self.inner.flush()?;
		Ok(())
	}

	/// Sends raw bytes verbatim, used only for the initial `A<len>H<user>\n`
	/// handshake line which has no request id or opcode.
	pub fn send_raw(&mut self, bytes: &[u8]) -> WireResult<()> {
		if self.trace {
			trace!(">>> {}", String::from_utf8_lossy(bytes).trim_end());
		}
		self.inner.write_all(bytes)?;
		self.inner.flush()?;
		Ok(())
	}
}
