// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synthesizes the PCM waveform for a tokenized program, mirroring the Apple II cassette
//! interface's leader/sync/body framing.

use crate::bytes::{write_u16_le, xor_checksum};
use crate::cassette::tone::{
    Tone, LEADER_CYCLES, LEADER_HZ, SYNC_HIGH_HZ, SYNC_LOW_HZ, TRAILING_LEADER_CYCLES,
    TRAILING_LOW_CYCLES,
};

/// `0xD5` in the length record's auto-run byte causes the Apple II to run the program
/// immediately after load.
const AUTO_RUN_FLAG: u8 = 0xD5;

fn write_length_record(out: &mut Vec<u8>, program_len: u16, auto_run: bool, sample_rate: u32) {
    let mut body = [0u8; 3];
    write_u16_le(&mut body, 0, program_len);
    body[2] = if auto_run { AUTO_RUN_FLAG } else { 0x00 };

    let mut record = body.to_vec();
    record.push(xor_checksum(&body));

    write_header(out, sample_rate);
    crate::cassette::tone::encode_bits(out, &record, false, sample_rate);
}

fn checksummed_record(bytes: &[u8]) -> Vec<u8> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let mut record = bytes.to_vec();
    record.push(xor_checksum(bytes));
    record
}

fn write_header(out: &mut Vec<u8>, sample_rate: u32) {
    Tone::new(LEADER_HZ, LEADER_CYCLES).write(out, sample_rate);
    Tone::new(SYNC_HIGH_HZ, 0.5).write(out, sample_rate);
    Tone::inverted(SYNC_LOW_HZ, 0.5).write(out, sample_rate);
}

/// Encodes `program` (and optional `data`) into raw 8-bit unsigned PCM samples at
/// `sample_rate`, framed as the length record followed by the program record (and data
/// record, in high-frequency mode, if `data` is non-empty).
pub fn encode(program: &[u8], data: &[u8], auto_run: bool, sample_rate: u32) -> Vec<u8> {
    let mut samples = Vec::new();

    write_length_record(&mut samples, program.len() as u16, auto_run, sample_rate);

    write_header(&mut samples, sample_rate);
    let program_record = checksummed_record(program);
    crate::cassette::tone::encode_bits(&mut samples, &program_record, false, sample_rate);
    let data_record = checksummed_record(data);
    crate::cassette::tone::encode_bits(&mut samples, &data_record, true, sample_rate);

    Tone::new(SYNC_LOW_HZ, TRAILING_LOW_CYCLES).write(&mut samples, sample_rate);
    Tone::new(LEADER_HZ, TRAILING_LEADER_CYCLES).write(&mut samples, sample_rate);

    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_nonempty_samples() {
        let samples = encode(&[0x01, 0x02, 0x03], &[], true, 48_000);
        assert!(!samples.is_empty());
        // Every sample is a valid 8-bit PCM value by construction (u8), nothing to assert
        // beyond non-emptiness and the midline-centered amplitude bound.
        for &s in &samples {
            assert!((128i32 - s as i32).unsigned_abs() <= 93 + 1);
        }
    }

    #[test]
    fn empty_program_yields_empty_record_but_still_frames_headers() {
        let with_program = encode(&[0x01], &[], false, 48_000);
        let without_program = encode(&[], &[], false, 48_000);
        assert!(without_program.len() < with_program.len());
    }
}
