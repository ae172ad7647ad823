// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A minimal PCM WAVE container: 8-bit unsigned mono samples, nothing else. Just enough
//! to carry the cassette signal between the encoder/decoder and the outside world.

use crate::bytes::{write_u16_le, write_u32_le};
use crate::errors::{AppleTapeError, Result};

/// Size of the fixed PCM header this module reads and writes.
pub const HEADER_LEN: usize = 44;

/// The sample rate the encoder writes by default. The reader always honors whatever rate
/// is declared in the header it's given.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// A decoded WAVE file: its declared sample rate and its raw 8-bit unsigned PCM samples.
pub struct Wave {
    pub sample_rate: u32,
    pub samples: Vec<u8>,
}

/// Writes `samples` (8-bit unsigned PCM, mono) into a complete WAVE file at `sample_rate`.
pub fn write(samples: &[u8], sample_rate: u32) -> Vec<u8> {
    let data_len = samples.len() as u32;
    let mut out = vec![0u8; HEADER_LEN + samples.len()];

    out[0..4].copy_from_slice(b"RIFF");
    write_u32_le(&mut out, 4, HEADER_LEN as u32 - 8 + data_len);
    out[8..12].copy_from_slice(b"WAVE");
    out[12..16].copy_from_slice(b"fmt ");
    write_u32_le(&mut out, 16, 16);
    write_u16_le(&mut out, 20, 1); // PCM
    write_u16_le(&mut out, 22, 1); // mono
    write_u32_le(&mut out, 24, sample_rate);
    write_u32_le(&mut out, 28, sample_rate); // byte rate: rate * channels * bits/8, mono 8-bit
    write_u16_le(&mut out, 32, 1); // block align
    write_u16_le(&mut out, 34, 8); // bits per sample
    out[36..40].copy_from_slice(b"data");
    write_u32_le(&mut out, 40, data_len);
    out[HEADER_LEN..].copy_from_slice(samples);

    out
}

/// Parses a WAVE file, validating the RIFF/WAVE/fmt/data tags and reading the sample rate
/// declared at offset 24.
pub fn read(bytes: &[u8]) -> Result<Wave> {
    if bytes.len() < HEADER_LEN {
        return Err(AppleTapeError::MalformedWave("file shorter than the 44-byte PCM header"));
    }
    if &bytes[0..4] != b"RIFF" {
        return Err(AppleTapeError::MalformedWave("missing RIFF tag"));
    }
    if &bytes[8..12] != b"WAVE" {
        return Err(AppleTapeError::MalformedWave("missing WAVE tag"));
    }
    if &bytes[12..16] != b"fmt " {
        return Err(AppleTapeError::MalformedWave("missing fmt  tag"));
    }
    if &bytes[36..40] != b"data" {
        return Err(AppleTapeError::MalformedWave("missing data tag"));
    }

    let sample_rate = u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]);
    let data_len = u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]) as usize;

    if HEADER_LEN + data_len > bytes.len() {
        return Err(AppleTapeError::MalformedWave("data chunk longer than the file"));
    }

    Ok(Wave { sample_rate, samples: bytes[HEADER_LEN..HEADER_LEN + data_len].to_vec() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_sample_rate_and_samples() {
        let samples = vec![128u8, 200, 50, 128];
        let file = write(&samples, 44_100);
        let decoded = read(&file).unwrap();
        assert_eq!(decoded.sample_rate, 44_100);
        assert_eq!(decoded.samples, samples);
    }

    #[test]
    fn rejects_bad_tags() {
        let mut file = write(&[1, 2, 3], DEFAULT_SAMPLE_RATE);
        file[0] = b'X';
        assert!(read(&file).is_err());
    }
}
