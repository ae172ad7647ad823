// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The tagged-sum representation of a tokenized line's body, used internally by the
//! assembler while building a line and by the disassembler while rendering one.

/// One piece of a tokenized line body: either a reserved-word opcode byte, a single
/// literal ASCII byte, or the verbatim remainder of a `REM` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyAtom {
    /// A reserved-word byte, `0x80..=0xFF`.
    Opcode(u8),
    /// One literal ASCII byte (identifier character, digit, operator, quote).
    Ascii(u8),
    /// The verbatim remainder of a `REM` line, emitted as one atom.
    Comment(Vec<u8>),
}

impl BodyAtom {
    /// Appends this atom's serialized bytes to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            BodyAtom::Opcode(b) => out.push(*b),
            BodyAtom::Ascii(b) => out.push(*b),
            BodyAtom::Comment(bytes) => out.extend_from_slice(bytes),
        }
    }
}

/// A disassembled BASIC line, as returned across the crate boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The line number parsed from the tokenized image.
    pub number: u16,
    /// The reconstructed line body, not including the line number.
    pub text_after_number: String,
    /// `"<number> <text_after_number>"`.
    pub full_text: String,
}
