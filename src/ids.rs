// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Read;

use derive_more::{From, Into};
use lyskom_wire::{ArgWriter, Decode, Encode, Reader, WireResult};

macro_rules! protocol_number {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
		pub struct $name(pub i32);

		impl Decode for $name {
			fn decode<R: Read>(r: &mut Reader<R>) -> WireResult<Self> {
				Ok($name(r.read_int()?))
			}
		}

		impl Encode for $name {
			fn encode(&self, w: &mut ArgWriter) {
				w.int(self.0);
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				write!(f, "{}", self.0)
			}
		}
	};
}

protocol_number!(ConfNo, "A conference number, shared by ordinary conferences and letterboxes.");
protocol_number!(PersNo, "A person number; every person also owns a letterbox `ConfNo` of the same value.");
protocol_number!(TextNo, "A global text number, unique across the whole server.");
protocol_number!(SessionNo, "A server session number, assigned at login and reused for `i-am-on`/`logout` async messages.");
protocol_number!(LocalTextNo, "A text number local to one conference; paired with a `TextNo` by `local-to-global`.");
