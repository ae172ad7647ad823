// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Round-trips an AppleSoft BASIC program through the Apple II's tokenized in-memory
//! representation and the audio signal its cassette interface reads and writes.
//!
//! Four subsystems, leaves first: [`bytes`] (little-endian I/O, the XOR checksum, bit
//! packing) and [`opcodes`] (the reserved-word table) underpin [`basic`] (the
//! tokenizer/assembler and detokenizer/disassembler), which [`cassette`] in turn encodes
//! to and decodes from PCM samples carried by [`wave`].
//!
//! This crate performs no I/O and owns no persisted state; every operation is a pure
//! function over in-memory buffers. File access, argument parsing, and any front-end are
//! the caller's responsibility.

pub mod basic;
pub mod bytes;
pub mod cassette;
pub mod errors;
pub mod opcodes;
pub mod wave;

pub use basic::{assemble, assemble_per_line, disassemble, Line};
pub use cassette::{decode_wave, encode_wave, DecodedArchive};
pub use errors::{AppleTapeError, Result};
