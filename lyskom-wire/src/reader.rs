// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use log::trace;

use crate::error::{WireError, WireResult};

/// A growing-buffer reader over a byte stream.
///
/// LysKOM's wire grammar is not length-prefixed at the frame level (only
/// individual Hollerith strings are) so a decoder has to be able to ask for
/// "at least `n` more bytes" without knowing up front how big the whole
/// response will be. `Reader` keeps everything it has read but not yet
/// consumed in `buf[pos..]` and tops the buffer up from the stream on
/// demand, the same shape as a Python socket file object's internal
/// read-ahead buffer.
pub struct Reader<R> {
	inner: R,
	buf: Vec<u8>,
	pos: usize,
	trace: bool,
}

impl<R: Read> Reader<R> {
	pub fn new(inner: R) -> Self {
		Self { inner, buf: Vec::with_capacity(4096), pos: 0, trace: false }
	}

	/// Enables per-byte `trace!` logging of everything consumed. Mirrors the
	/// `trace` flag on the connection this reader backs.
	pub fn set_trace(&mut self, trace: bool) {
		self.trace = trace;
	}

	/// Makes sure at least `n` unread bytes are available in `buf`, pulling
	/// more from `inner` as needed. Compacts the buffer first so it cannot
	/// grow without bound over a long-lived connection.
	fn ensure(&mut self, n: usize) -> WireResult<()> {
		if self.pos > 0 && self.buf.len() - self.pos < n {
			self.buf.drain(..self.pos);
			self.pos = 0;
		}
		while self.buf.len() - self.pos < n {
			let mut chunk = [0u8; 4096];
			let got = self.inner.read(&mut chunk)?;
			if got == 0 {
				return Err(WireError::Eof);
			}
			self.buf.extend_from_slice(&chunk[..got]);
		}
		Ok(())
	}

	fn peek_byte(&mut self) -> WireResult<u8> {
		self.ensure(1)?;
		Ok(self.buf[self.pos])
	}

	fn take_byte(&mut self) -> WireResult<u8> {
		self.ensure(1)?;
		let b = self.buf[self.pos];
		self.pos += 1;
		if self.trace {
			trace!("<<< {:?}", b as char);
		}
		Ok(b)
	}

	/// Reads exactly `n` raw bytes (used for Hollerith payloads).
	pub fn take_bytes(&mut self, n: usize) -> WireResult<Vec<u8>> {
		self.ensure(n)?;
		let bytes = self.buf[self.pos..self.pos + n].to_vec();
		self.pos += n;
		if self.trace {
			trace!("<<< {} byte(s)", n);
		}
		Ok(bytes)
	}

	/// Skips `SP`/`HT`/`CR`/`LF` and returns the first other byte without
	/// consuming it.
	fn skip_ws(&mut self) -> WireResult<u8> {
		loop {
			let b = self.peek_byte()?;
			if !matches!(b, b' ' | b'\t' | b'\r' | b'\n') {
				return Ok(b);
			}
			self.take_byte()?;
		}
	}

	/// Whether unconsumed bytes are already sitting in the buffer, i.e.
	/// whether the next read can be served without touching the socket.
	/// Used by a non-blocking drain to decide whether it's safe to process
	/// another message without risking a blocking read.
	pub fn has_buffered(&self) -> bool {
		self.pos < self.buf.len()
	}

	/// Reads a decimal integer, optionally signed, terminated by the first
	/// non-digit byte. The terminator is consumed and returned so callers
	/// that need to check it (for example a space versus a closing brace)
	/// can do so without an extra peek.
	pub fn read_int_and_terminator(&mut self) -> WireResult<(i32, u8)> {
		self.skip_ws()?;
		let mut negative = false;
		let mut b = self.peek_byte()?;
		if b == b'-' {
			negative = true;
			self.take_byte()?;
			b = self.peek_byte()?;
		}
		let mut digits = Vec::new();
		loop {
			b = self.peek_byte()?;
			if b.is_ascii_digit() {
				digits.push(b);
				self.take_byte()?;
			} else {
				break;
			}
		}
		if digits.is_empty() {
			return Err(WireError::UnexpectedChar { found: b as char, expected: "a digit" });
		}
		let terminator = self.take_byte()?;
		let magnitude: i32 = std::str::from_utf8(&digits)
			.unwrap()
			.parse()
			.map_err(|_| WireError::InvalidInt(String::from_utf8_lossy(&digits).into_owned()))?;
		Ok((if negative { -magnitude } else { magnitude }, terminator))
	}

	pub fn read_int(&mut self) -> WireResult<i32> {
		Ok(self.read_int_and_terminator()?.0)
	}

	/// Reads a floating point literal (digits, an optional `.` and
	/// fractional digits, an optional exponent), terminated by whitespace.
	pub fn read_float(&mut self) -> WireResult<f64> {
		self.skip_ws()?;
		let mut digits = Vec::new();
		loop {
			let b = self.peek_byte()?;
			if b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E') {
				digits.push(b);
				self.take_byte()?;
			} else {
				break;
			}
		}
		let text = String::from_utf8_lossy(&digits).into_owned();
		text.parse().map_err(|_| WireError::InvalidFloat(text))
	}

	/// Reads a Hollerith string: `<len>H<len bytes>`. Returns the raw bytes;
	/// the caller decides how to decode them (LysKOM text is ISO-8859-1).
	pub fn read_hollerith(&mut self) -> WireResult<Vec<u8>> {
		self.skip_ws()?;
		let mut digits = Vec::new();
		loop {
			let b = self.peek_byte()?;
			if b.is_ascii_digit() {
				digits.push(b);
				self.take_byte()?;
			} else {
				break;
			}
		}
		if digits.is_empty() {
			let found = self.peek_byte()?;
			return Err(WireError::UnexpectedChar { found: found as char, expected: "a Hollerith length" });
		}
		let marker = self.take_byte()?;
		if marker != b'H' {
			return Err(WireError::UnexpectedChar { found: marker as char, expected: "'H'" });
		}
		let len: usize = std::str::from_utf8(&digits)
			.unwrap()
			.parse()
			.map_err(|_| WireError::UnexpectedChar {
				found: digits.last().map(|&b| b as char).unwrap_or('H'),
				expected: "a valid Hollerith length",
			})?;
		self.take_bytes(len)
	}

	/// Reads a fixed-width bitstring of `n` `'0'`/`'1'` characters, skipping
	/// leading whitespace before the first bit the way every other atom
	/// does.
	pub fn read_bitstring(&mut self, n: usize) -> WireResult<Vec<bool>> {
		self.skip_ws()?;
		let mut bits = Vec::with_capacity(n);
		for _ in 0..n {
			let b = self.take_byte()?;
			match b {
				b'0' => bits.push(false),
				b'1' => bits.push(true),
				other => return Err(WireError::UnexpectedChar { found: other as char, expected: "'0' or '1'" }),
			}
		}
		Ok(bits)
	}

	/// Reads a `{ n elem elem ... }` or `*` array, decoding each element
	/// with `decode_elem`. `*` (opted out) decodes to an empty `Vec`.
	pub fn read_array<T>(
		&mut self,
		mut decode_elem: impl FnMut(&mut Self) -> WireResult<T>,
	) -> WireResult<Vec<T>> {
		let first = self.skip_ws()?;
		if first == b'*' {
			self.take_byte()?;
			return Ok(Vec::new());
		}
		let count = self.read_int()? as usize;
		self.skip_ws()?;
		let open = self.take_byte()?;
		if open != b'{' {
			return Err(WireError::UnexpectedChar { found: open as char, expected: "'{'" });
		}
		let mut items = Vec::with_capacity(count);
		for _ in 0..count {
			items.push(decode_elem(self)?);
		}
		self.skip_ws()?;
		let close = self.take_byte()?;
		if close != b'}' {
			return Err(WireError::UnexpectedChar { found: close as char, expected: "'}'" });
		}
		Ok(items)
	}

	/// Skips whitespace and consumes the first non-whitespace byte: the
	/// `=`/`%`/`:` frame discriminator a server-message loop branches on.
	pub fn read_non_ws_byte(&mut self) -> WireResult<u8> {
		self.skip_ws()?;
		self.take_byte()
	}

	/// Consumes exactly one byte and checks it against `expected`.
	pub fn expect_byte(&mut self, expected: u8) -> WireResult<()> {
		let found = self.take_byte()?;
		if found != expected {
			return Err(WireError::UnexpectedChar { found: found as char, expected: "a specific byte" });
		}
		Ok(())
	}

	/// Reads one line (up to and including the terminating `\n`, which is
	/// stripped), used for the initial `LysKOM\n` handshake banner.
	pub fn read_line(&mut self) -> WireResult<Vec<u8>> {
		let mut out = Vec::new();
		loop {
			let b = self.take_byte()?;
			if b == b'\n' {
				break;
			}
			out.push(b);
		}
		Ok(out)
	}
}
