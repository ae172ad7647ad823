// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The BASIC tokenizer/assembler and detokenizer/disassembler pair. Together they define
//! the byte format the cassette audio layer transports.

pub mod assembler;
pub mod atom;
pub mod disassembler;

pub use assembler::{assemble, assemble_per_line, LOAD_ADDRESS};
pub use atom::{BodyAtom, Line};
pub use disassembler::disassemble;
