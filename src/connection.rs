// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The request multiplexer: handshake, correlation IDs, the
//! pending/response/error tables, and the asynchronous-message dispatcher
//! that sits on top of the same server-message loop.

use std::collections::HashMap;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use log::{debug, trace, warn};
use lyskom_wire::{string_to_latin1, ArgWriter, Reader, WireError, WireResult, Writer};
use socket2::{Domain, Protocol, Socket, Type};

use crate::async_message::AsyncMessage;
use crate::error::{Error, ErrorCode, LocalError, Result};
use crate::request::{Request, ResponseValue};

const DEFAULT_PORT: u16 = 4894;

/// Builds a [`Connection`]: host, port, the free-form user-identification
/// string sent in the handshake, an optional local bind address, and the
/// trace flag. Mirrors the constructor arguments of the reference client's
/// `Connection`, as a builder rather than a long parameter list.
pub struct ConnectionBuilder {
	host: String,
	port: u16,
	user: String,
	local_bind: Option<SocketAddr>,
	trace: bool,
}

impl ConnectionBuilder {
	pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
		Self { host: host.into(), port: DEFAULT_PORT, user: user.into(), local_bind: None, trace: false }
	}

	pub fn port(mut self, port: u16) -> Self {
		self.port = port;
		self
	}

	/// Binds the client side of the TCP connection to `addr` before
	/// connecting, e.g. to pin the outgoing interface on a multi-homed host.
	pub fn local_bind(mut self, addr: SocketAddr) -> Self {
		self.local_bind = Some(addr);
		self
	}

	pub fn trace(mut self, trace: bool) -> Self {
		self.trace = trace;
		self
	}

	/// Opens the TCP connection, performs the `A<len>H<user>\n` / `LysKOM\n`
	/// handshake, and returns a `Connection` ready for `call`/`await`.
	pub fn connect(self) -> Result<Connection> {
		let target: SocketAddr = (self.host.as_str(), self.port)
			.to_socket_addrs()
			.map_err(LocalError::Receive)?
			.next()
			.ok_or_else(|| LocalError::Receive(io::Error::new(io::ErrorKind::NotFound, "no address found for host")))?;

		let stream = match self.local_bind {
			Some(local) => {
				let socket = Socket::new(Domain::for_address(local), Type::STREAM, Some(Protocol::TCP))
					.map_err(LocalError::Receive)?;
				socket.bind(&local.into()).map_err(LocalError::Receive)?;
				socket.connect(&target.into()).map_err(LocalError::Receive)?;
				socket.into()
			}
			None => TcpStream::connect(target).map_err(LocalError::Receive)?,
		};

		let writer_stream = stream.try_clone().map_err(LocalError::Receive)?;
		let reader_stream = stream.try_clone().map_err(LocalError::Receive)?;

		let mut writer = Writer::new(writer_stream);
		let mut reader = Reader::new(reader_stream);
		writer.set_trace(self.trace);
		reader.set_trace(self.trace);

		let user_bytes = string_to_latin1(&self.user);
		let mut handshake = Vec::with_capacity(user_bytes.len() + 8);
		handshake.push(b'A');
		handshake.extend_from_slice(user_bytes.len().to_string().as_bytes());
		handshake.push(b'H');
		handshake.extend_from_slice(&user_bytes);
		handshake.push(b'\n');
		writer.send_raw(&handshake).map_err(LocalError::Protocol)?;

		let banner = reader.read_line().map_err(LocalError::Protocol)?;
		if banner != b"LysKOM" {
			warn!("bad initial response from server: {:?}", String::from_utf8_lossy(&banner));
			return Err(Error::Local(LocalError::BadInitialResponse));
		}

		Ok(Connection {
			writer,
			reader,
			control: stream,
			next_id: 0,
			pending: HashMap::new(),
			responses: HashMap::new(),
			errors: HashMap::new(),
			async_handlers: HashMap::new(),
			trace: self.trace,
			histogram: None,
		})
	}
}

type PendingDecoder = Box<dyn FnOnce(&mut Reader<TcpStream>) -> WireResult<ResponseValue>>;
type AsyncHandler = Box<dyn FnMut(&AsyncMessage, &mut Connection)>;

/// One multiplexed connection to a LysKOM server: the live socket, the
/// correlation-ID counter, the pending/response/error tables, and the
/// registry of asynchronous-message handlers. All state here is touched
/// only by whichever call is currently the single active reader, per the
/// connection's cooperative single-threaded use.
pub struct Connection {
	writer: Writer<TcpStream>,
	reader: Reader<TcpStream>,
	/// A third clone of the socket, used only to toggle non-blocking mode
	/// for [`Connection::poll_available`]'s single drain. On Unix this
	/// shares the same open file description as `reader`'s stream, so
	/// flipping `O_NONBLOCK` here is visible there too.
	control: TcpStream,
	next_id: i32,
	pending: HashMap<i32, PendingDecoder>,
	responses: HashMap<i32, ResponseValue>,
	errors: HashMap<i32, (ErrorCode, i32)>,
	async_handlers: HashMap<i32, Vec<AsyncHandler>>,
	trace: bool,
	histogram: Option<HashMap<String, u64>>,
}

impl Connection {
	pub fn trace(&self) -> bool {
		self.trace
	}

	/// Turns on the request-class histogram (`kom.py`'s `req_histo`):
	/// every `submit` after this point counts against its request type's
	/// name.
	pub fn enable_request_histogram(&mut self) {
		self.histogram = Some(HashMap::new());
	}

	pub fn request_histogram(&self) -> Option<&HashMap<String, u64>> {
		self.histogram.as_ref()
	}

	fn next_request_id(&mut self) -> i32 {
		self.next_id += 1;
		self.next_id
	}

	/// Reserves a fresh correlation ID and records how to decode `Req`'s
	/// response once it arrives. Does not write anything to the socket;
	/// pair with [`Connection::submit`].
	pub fn register<Req>(&mut self) -> i32
	where
		Req: Request + 'static,
		Req::Response: Into<ResponseValue>,
	{
		let id = self.next_request_id();
		self.pending.insert(id, Box::new(|r| Req::decode_response(r).map(Into::into)));
		id
	}

	/// Serializes and sends `req` under the correlation ID a prior
	/// [`Connection::register`] returned.
	pub fn submit<Req: Request>(&mut self, id: i32, req: &Req) -> Result<()> {
		let mut args = ArgWriter::new();
		req.encode_args(&mut args);
		self.writer.send_request(id, Req::OPCODE as u32, &args).map_err(LocalError::Protocol)?;
		if let Some(histogram) = &mut self.histogram {
			*histogram.entry(request_class_name::<Req>()).or_insert(0) += 1;
		}
		Ok(())
	}

	/// Registers, sends, and blocks for `req`'s reply, returning the
	/// type-erased [`ResponseValue`]. Useful for callers that want to match
	/// on the response shape directly rather than go through the
	/// statically-typed [`Connection::call`].
	pub fn call_raw<Req>(&mut self, req: Req) -> Result<ResponseValue>
	where
		Req: Request + 'static,
		Req::Response: Into<ResponseValue>,
	{
		let id = self.register::<Req>();
		self.submit(id, &req)?;
		self.await_response(id)
	}

	/// Registers, sends, and blocks for `req`'s reply, returning it as
	/// `Req::Response` directly.
	pub fn call<Req>(&mut self, req: Req) -> Result<Req::Response>
	where
		Req: Request + 'static,
		Req::Response: Into<ResponseValue> + TryFrom<ResponseValue, Error = ResponseValue>,
	{
		let value = self.call_raw(req)?;
		Ok(Req::Response::try_from(value)
			.unwrap_or_else(|_| unreachable!("decoded response did not match the request that produced it")))
	}

	/// Blocks until `id`'s reply has arrived, reading and processing
	/// whatever server messages (replies for other IDs, errors, async
	/// notifications) show up first.
	pub fn await_response(&mut self, id: i32) -> Result<ResponseValue> {
		loop {
			if let Some(value) = self.responses.remove(&id) {
				return Ok(value);
			}
			if let Some((code, status)) = self.errors.remove(&id) {
				return Err(Error::Server { code, status });
			}
			self.process_one_message()?;
		}
	}

	/// Drains whatever is already readable on the socket without blocking,
	/// dispatching async messages and filing replies as it goes. Useful for
	/// pumping notifications between calls when nothing is currently
	/// outstanding.
	pub fn poll_available(&mut self) -> Result<()> {
		loop {
			if self.reader.has_buffered() {
				self.process_one_message()?;
				continue;
			}
			self.control.set_nonblocking(true).map_err(LocalError::Receive)?;
			let mut probe = [0u8; 1];
			let peeked = self.control.peek(&mut probe);
			self.control.set_nonblocking(false).map_err(LocalError::Receive)?;
			match peeked {
				Ok(0) => {
					return Err(Error::Local(LocalError::Receive(io::Error::new(
						io::ErrorKind::UnexpectedEof,
						"connection closed",
					))))
				}
				Ok(_) => self.process_one_message()?,
				Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
				Err(e) => return Err(Error::Local(LocalError::Receive(e))),
			}
		}
	}

	/// Reads and handles exactly one server message: a reply, an error, or
	/// an async notification.
	fn process_one_message(&mut self) -> Result<()> {
		let discriminator = self.reader.read_non_ws_byte().map_err(LocalError::Protocol)?;
		match discriminator {
			b'=' => {
				let id = self.reader.read_int().map_err(LocalError::Protocol)?;
				let decode = self.pending.remove(&id).ok_or(LocalError::BadRequestId(id))?;
				let value = decode(&mut self.reader).map_err(LocalError::Protocol)?;
				trace!("reply for id {}", id);
				self.responses.insert(id, value);
			}
			b'%' => {
				let id = self.reader.read_int().map_err(LocalError::Protocol)?;
				let error_no = self.reader.read_int().map_err(LocalError::Protocol)?;
				let status = self.reader.read_int().map_err(LocalError::Protocol)?;
				if self.pending.remove(&id).is_none() {
					return Err(Error::Local(LocalError::BadRequestId(id)));
				}
				self.errors.insert(id, (ErrorCode::from_wire(error_no), status));
			}
			b':' => {
				let _nargs = self.reader.read_int().map_err(LocalError::Protocol)?;
				let tag = self.reader.read_int().map_err(LocalError::Protocol)?;
				match AsyncMessage::decode_tagged(tag, &mut self.reader).map_err(LocalError::Protocol)? {
					Some(msg) => {
						debug!("async message tag {}", tag);
						self.dispatch_async(msg);
					}
					None => {
						warn!("unimplemented async message tag {}", tag);
						return Err(Error::Local(LocalError::UnimplementedAsync(tag)));
					}
				}
			}
			other => {
				return Err(Error::Local(LocalError::Protocol(WireError::UnexpectedChar {
					found: other as char,
					expected: "'=', '%', or ':'",
				})));
			}
		}
		Ok(())
	}

	/// Registers `handler` to run, in addition to any already registered for
	/// `tag`, whenever an async message with that tag is dispatched.
	pub fn register_async_handler<F>(&mut self, tag: i32, handler: F)
	where
		F: FnMut(&AsyncMessage, &mut Connection) + 'static,
	{
		self.async_handlers.entry(tag).or_default().push(Box::new(handler));
	}

	/// Runs every handler registered for `msg`'s tag, in registration order.
	/// Handlers are removed from the map for the duration of the call so
	/// they can themselves hold a `&mut Connection` (issuing further
	/// requests) without a double-borrow of `self`.
	fn dispatch_async(&mut self, msg: AsyncMessage) {
		let tag = msg.tag();
		if let Some(mut handlers) = self.async_handlers.remove(&tag) {
			for handler in handlers.iter_mut() {
				handler(&msg, self);
			}
			self.async_handlers.insert(tag, handlers);
		}
	}

	/// Tells the server which async tags to actually deliver (`accept-async`,
	/// opcode 80). Registering a handler with
	/// [`Connection::register_async_handler`] has no effect on the wire
	/// until the tag is also accepted here.
	pub fn accept_async(&mut self, tags: &[i32]) -> Result<()> {
		self.call(crate::request::ReqAcceptAsync { request_list: tags.to_vec() })
	}
}

/// The trailing path segment of `Req`'s type name, used as the histogram
/// key so the catalog doesn't need a hand-maintained name table.
fn request_class_name<Req>() -> String {
	let full = std::any::type_name::<Req>();
	full.rsplit("::").next().unwrap_or(full).to_string()
}

#[cfg(test)]
mod tests {
	use std::io::{Read as _, Write as _};
	use std::net::TcpListener;
	use std::thread;

	use super::*;

	fn spawn_echo_server(banner: &'static [u8]) -> u16 {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let port = listener.local_addr().unwrap().port();
		thread::spawn(move || {
			let (mut sock, _) = listener.accept().unwrap();
			let mut buf = [0u8; 1024];
			let n = sock.read(&mut buf).unwrap();
			assert!(n > 0);
			sock.write_all(banner).unwrap();
			// Keep the connection open briefly so the client can read the
			// banner before the thread (and socket) tears down.
			thread::sleep(std::time::Duration::from_millis(50));
		});
		port
	}

	#[test]
	fn handshake_accepts_exact_banner() {
		let port = spawn_echo_server(b"LysKOM\n");
		let conn = ConnectionBuilder::new("127.0.0.1", "test-user").port(port).connect();
		assert!(conn.is_ok());
	}

	#[test]
	fn handshake_rejects_wrong_banner() {
		let port = spawn_echo_server(b"nope\n");
		let conn = ConnectionBuilder::new("127.0.0.1", "test-user").port(port).connect();
		match conn {
			Err(Error::Local(LocalError::BadInitialResponse)) => {}
			other => panic!("expected BadInitialResponse, got {:?}", other.map(|_| ())),
		}
	}

	#[test]
	fn request_class_name_is_trailing_segment() {
		assert_eq!(request_class_name::<crate::request::ReqWhoAmI>(), "ReqWhoAmI");
	}
}
