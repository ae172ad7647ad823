// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the crate-wide error type.

use std::error::Error as StdError;
use std::fmt;
use std::result;

/// `AppleTapeError` enumerates every way a tokenize/assemble/encode/decode call can fail.
#[derive(Debug)]
pub enum AppleTapeError {
    /// A BASIC line number was missing, negative, or `>= 63999`.
    InvalidLineNumber(i64),
    /// A token byte in `0x80..=0xFF` has no mnemonic in the opcode table.
    UnknownOpcode(u8),
    /// A fixed-offset byte read ran past the end of the buffer.
    OutOfRange { index: usize, len: usize },
    /// A fixed-width field could not hold the value given to it.
    Overflow { needed: usize, got: usize },
    /// A trailing checksum byte did not match the data it covers.
    ChecksumMismatch { expected: u8, actual: u8, block: &'static str },
    /// The demodulator measured a frequency outside the valid set mid-block.
    UnexpectedFrequency { hz: u32, sample: usize },
    /// Could not locate the k-th leader tone or its sync bit.
    NoHeaderFound { which: usize },
    /// The sample buffer ended before a full byte of bits was read.
    TruncatedBitStream { bits_read: usize },
    /// A tokenized-line read ran past the end of the program buffer.
    TruncatedInput,
    /// The WAVE container's RIFF/WAVE/fmt/data framing was malformed.
    MalformedWave(&'static str),
}

impl fmt::Display for AppleTapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AppleTapeError::InvalidLineNumber(n) => {
                write!(f, "invalid line number: {}", n)
            }
            AppleTapeError::UnknownOpcode(b) => {
                write!(f, "unknown opcode byte: {:#04x}", b)
            }
            AppleTapeError::OutOfRange { index, len } => {
                write!(f, "read at index {} out of range for buffer of length {}", index, len)
            }
            AppleTapeError::Overflow { needed, got } => {
                write!(f, "value needs {} bytes but only {} were available", needed, got)
            }
            AppleTapeError::ChecksumMismatch { expected, actual, block } => {
                write!(
                    f,
                    "checksum mismatch in {}: expected {:#04x}, computed {:#04x}",
                    block, expected, actual
                )
            }
            AppleTapeError::UnexpectedFrequency { hz, sample } => {
                write!(f, "unexpected frequency {} Hz at sample {}", hz, sample)
            }
            AppleTapeError::NoHeaderFound { which } => {
                write!(f, "could not locate leader tone #{}", which)
            }
            AppleTapeError::TruncatedBitStream { bits_read } => {
                write!(f, "bit stream ended after {} bits, mid-byte", bits_read)
            }
            AppleTapeError::TruncatedInput => {
                write!(f, "tokenized program image ended unexpectedly")
            }
            AppleTapeError::MalformedWave(reason) => {
                write!(f, "malformed WAVE container: {}", reason)
            }
        }
    }
}

impl StdError for AppleTapeError {}

pub type Result<T> = result::Result<T, AppleTapeError>;

/// Convenience constructor for an out-of-range byte read.
pub fn out_of_range_error<T>(index: usize, len: usize) -> Result<T> {
    Err(AppleTapeError::OutOfRange { index, len })
}

/// Convenience constructor for a checksum mismatch.
pub fn checksum_error<T>(expected: u8, actual: u8, block: &'static str) -> Result<T> {
    Err(AppleTapeError::ChecksumMismatch { expected, actual, block })
}
