// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The AppleSoft BASIC opcode table: a fixed bijective mapping between reserved words and
//! single bytes in `0x80..=0xFF`.
//!
//! This is process-wide read-only data. Rather than a constructed singleton, it lives in a
//! [`once_cell::sync::Lazy`] static built once from [`OPCODES`], a plain `const` array —
//! there is nothing to own or mutate, so no type is ever instantiated for it.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// `(mnemonic, byte)` pairs, in token order. `REM` is `0xB2`.
pub const OPCODES: &[(&str, u8)] = &[
    ("END", 0x80),
    ("FOR", 0x81),
    ("NEXT", 0x82),
    ("DATA", 0x83),
    ("INPUT", 0x84),
    ("DEL", 0x85),
    ("DIM", 0x86),
    ("READ", 0x87),
    ("GR", 0x88),
    ("TEXT", 0x89),
    ("PR#", 0x8A),
    ("IN#", 0x8B),
    ("CALL", 0x8C),
    ("PLOT", 0x8D),
    ("HLIN", 0x8E),
    ("VLIN", 0x8F),
    ("HGR2", 0x90),
    ("HGR", 0x91),
    ("HCOLOR=", 0x92),
    ("HPLOT", 0x93),
    ("DRAW", 0x94),
    ("XDRAW", 0x95),
    ("HTAB", 0x96),
    ("HOME", 0x97),
    ("ROT=", 0x98),
    ("SCALE=", 0x99),
    ("SHLOAD", 0x9A),
    ("TRACE", 0x9B),
    ("NOTRACE", 0x9C),
    ("NORMAL", 0x9D),
    ("INVERSE", 0x9E),
    ("FLASH", 0x9F),
    ("COLOR=", 0xA0),
    ("POP", 0xA1),
    ("VTAB", 0xA2),
    ("HIMEM:", 0xA3),
    ("LOMEM:", 0xA4),
    ("ONERR", 0xA5),
    ("RESUME", 0xA6),
    ("GET", 0xA7),
    ("PAUSE", 0xA8),
    ("PR0", 0xA9),
    ("LET", 0xAA),
    ("GOTO", 0xAB),
    ("RUN", 0xAC),
    ("IF", 0xAD),
    ("RESTORE", 0xAE),
    ("&", 0xAF),
    ("GOSUB", 0xB0),
    ("RETURN", 0xB1),
    ("REM", 0xB2),
    ("STOP", 0xB3),
    ("ON", 0xB4),
    ("WAIT", 0xB5),
    ("LOAD", 0xB6),
    ("SAVE", 0xB7),
    ("DEF", 0xB8),
    ("POKE", 0xB9),
    ("PRINT", 0xBA),
    ("CONT", 0xBB),
    ("LIST", 0xBC),
    ("CLEAR", 0xBD),
    ("NEW", 0xBE),
    ("TAB(", 0xBF),
    ("TO", 0xC0),
    ("FN", 0xC1),
    ("SPC(", 0xC2),
    ("THEN", 0xC3),
    ("AT", 0xC4),
    ("NOT", 0xC5),
    ("STEP", 0xC6),
    ("+", 0xC7),
    ("-", 0xC8),
    ("*", 0xC9),
    ("/", 0xCA),
    ("^", 0xCB),
    ("AND", 0xCC),
    ("OR", 0xCD),
    (">", 0xCE),
    ("=", 0xCF),
    ("<", 0xD0),
    ("SGN", 0xD1),
    ("INT", 0xD2),
    ("ABS", 0xD3),
    ("USR", 0xD4),
    ("FRE", 0xD5),
    ("POS", 0xD6),
    ("SQR", 0xD7),
    ("RND", 0xD8),
    ("LOG", 0xD9),
    ("EXP", 0xDA),
    ("COS", 0xDB),
    ("SIN", 0xDC),
    ("TAN", 0xDD),
    ("ATN", 0xDE),
    ("PEEK", 0xDF),
    ("LEN", 0xE0),
    ("STR$", 0xE1),
    ("VAL", 0xE2),
    ("ASC", 0xE3),
    ("CHR$", 0xE4),
    ("LEFT$", 0xE5),
    ("RIGHT$", 0xE6),
    ("MID$", 0xE7),
];

/// Bidirectional opcode table: mnemonic → byte and byte → mnemonic.
pub struct OpcodeTable {
    by_mnemonic: HashMap<&'static str, u8>,
    by_byte: HashMap<u8, &'static str>,
}

impl OpcodeTable {
    fn build() -> Self {
        let mut by_mnemonic = HashMap::with_capacity(OPCODES.len());
        let mut by_byte = HashMap::with_capacity(OPCODES.len());
        for &(mnemonic, byte) in OPCODES {
            by_mnemonic.insert(mnemonic, byte);
            by_byte.insert(byte, mnemonic);
        }
        OpcodeTable { by_mnemonic, by_byte }
    }

    /// Looks up the opcode byte for a mnemonic, matched case-sensitively and exactly.
    pub fn byte_for(&self, mnemonic: &str) -> Option<u8> {
        self.by_mnemonic.get(mnemonic).copied()
    }

    /// Looks up the mnemonic for an opcode byte.
    pub fn mnemonic_for(&self, byte: u8) -> Option<&'static str> {
        self.by_byte.get(&byte).copied()
    }
}

/// The single process-wide opcode table, built once on first use.
pub static TABLE: Lazy<OpcodeTable> = Lazy::new(OpcodeTable::build);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rem_is_0xb2() {
        assert_eq!(TABLE.byte_for("REM"), Some(0xB2));
        assert_eq!(TABLE.mnemonic_for(0xB2), Some("REM"));
    }

    #[test]
    fn table_is_bijective() {
        let mut seen = std::collections::HashSet::new();
        for &(mnemonic, byte) in OPCODES {
            assert!(seen.insert(byte), "duplicate opcode byte {:#04x} for {}", byte, mnemonic);
            assert!((0x80..=0xFF).contains(&byte));
        }
    }

    #[test]
    fn unknown_mnemonic_misses() {
        assert_eq!(TABLE.byte_for("NOTATOKEN"), None);
    }
}
