// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Demodulates a cassette PCM signal back into bytes using a zero-crossing frequency
//! counter, the same technique the Apple II's cassette read circuit uses, then
//! reconstructs the length/program/data block framing and validates checksums.
//!
//! This is the most subtle component in the crate: the zero-crossing state machine
//! (§4.6/§4.7 of `SPEC_FULL.md`) is not parallelized and must see every sample in order.

use std::collections::BTreeMap;

use crate::bytes::bits_to_bytes_validated;
use crate::cassette::tone::{BIT_ONE_HIGH_HZ, BIT_ONE_HZ, BIT_ZERO_HIGH_HZ, BIT_ZERO_HZ, KNOWN_FREQUENCIES, LEADER_HZ, SYNC_HIGH_HZ};
use crate::errors::{AppleTapeError, Result};

/// The 5-bit gap hard-coded between the program-block checksum and the start of the data
/// block. Determined empirically from real archives; not derived from first principles.
const DATA_BLOCK_GAP_BITS: usize = 5;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Signal {
    High,
    Low,
}

/// Per-`decode` transient state for the zero-crossing demodulator. Created fresh for each
/// call and discarded on return; never shared across calls.
struct ZeroCrossingState {
    signal: Signal,
    last_crossing_time: f64,
    last_amplitude: i32,
    last_recorded_frequency: f64,
    frequency_map: BTreeMap<usize, f64>,
}

impl ZeroCrossingState {
    fn new() -> Self {
        ZeroCrossingState {
            signal: Signal::High,
            last_crossing_time: 0.0,
            last_amplitude: 0,
            last_recorded_frequency: 0.0,
            frequency_map: BTreeMap::new(),
        }
    }

    fn handle_sample(&mut self, i: usize, v: i32, sample_rate: u32) {
        let s = if v >= 0 { Signal::High } else { Signal::Low };
        if s == self.signal {
            self.last_amplitude = v;
            return;
        }

        let total_delta = (v - self.last_amplitude) as f64;
        let fraction = (v as f64 / total_delta).abs();
        let fixed_time = i as f64 - fraction;

        let dt_samples = fixed_time - self.last_crossing_time;
        let seconds_per_full_cycle = 2.0 * dt_samples / sample_rate as f64;
        let f = 1.0 / seconds_per_full_cycle;

        if !f.is_finite() {
            self.last_crossing_time = fixed_time;
            self.last_amplitude = v;
            return;
        }

        let fc = snap_to_known_frequency(f);

        if fc != self.last_recorded_frequency {
            // A zero crossing only confirms its frequency after a full half-cycle of it
            // has elapsed, so `i` lands at the end of that half-cycle, not its start.
            // Back-date to the start, clamping at 0 for the first crossing in the buffer.
            let half_cycle_samples = (sample_rate as f64 / (fc / 0.5)).ceil();
            let start = i as f64 - (half_cycle_samples - 1.0);
            let start = if start > 0.0 { start as usize } else { 0 };
            self.frequency_map.insert(start, fc);
            self.last_recorded_frequency = fc;
        }

        self.signal = s;
        self.last_crossing_time = fixed_time;
        self.last_amplitude = v;
    }
}

fn snap_to_known_frequency(f: f64) -> f64 {
    let mut best = f;
    let mut best_delta = f64::INFINITY;
    for &known in &KNOWN_FREQUENCIES {
        let delta = (f - known).abs();
        if delta < best_delta {
            best_delta = delta;
            best = known;
        }
    }
    if best_delta <= 250.0 {
        best
    }
    else {
        f
    }
}

/// Builds an array mapping every sample index to the largest `frequency_map` key at or
/// before it, in one linear sweep, so frequency lookups during frame parsing are O(1).
fn build_optimized_map(num_samples: usize, frequency_map: &BTreeMap<usize, f64>) -> Vec<usize> {
    let mut optimized = vec![0usize; num_samples];
    let mut keys = frequency_map.keys().copied().peekable();
    let mut current = 0usize;
    for (j, slot) in optimized.iter_mut().enumerate() {
        while let Some(&k) = keys.peek() {
            if k <= j {
                current = k;
                keys.next();
            }
            else {
                break;
            }
        }
        *slot = current;
    }
    optimized
}

/// The result of demodulating a full sample buffer: the sparse frequency observations and
/// the O(1) lookup array built from them.
struct Demodulated {
    frequency_map: BTreeMap<usize, f64>,
    optimized_map: Vec<usize>,
}

impl Demodulated {
    fn run(samples: &[u8], sample_rate: u32) -> Self {
        let mut state = ZeroCrossingState::new();
        for (i, &raw) in samples.iter().enumerate() {
            let v = raw as i32 - 128;
            state.handle_sample(i, v, sample_rate);
        }
        let optimized_map = build_optimized_map(samples.len(), &state.frequency_map);
        Demodulated { frequency_map: state.frequency_map, optimized_map }
    }

    fn inferred_frequency(&self, i: usize) -> Option<f64> {
        if i >= self.optimized_map.len() {
            return None;
        }
        self.frequency_map.get(&self.optimized_map[i]).copied()
    }

    fn leader_starts(&self) -> Vec<usize> {
        self.frequency_map
            .iter()
            .filter(|&(_, &hz)| hz == LEADER_HZ)
            .map(|(&idx, _)| idx)
            .collect()
    }

    fn find_sync_start(&self, from: usize) -> Option<usize> {
        self.frequency_map
            .range(from..)
            .find(|&(_, &hz)| hz == SYNC_HIGH_HZ)
            .map(|(&idx, _)| idx)
    }
}

/// Reads bits starting at sample `start`, one per full cycle, until either `max_bits` have
/// been read (if given) or the tone stops looking like a bit (770/2500 Hz, or end of
/// stream). Returns the bits and the sample index just past the last one read.
fn read_bit_stream(
    demod: &Demodulated,
    num_samples: usize,
    sample_rate: u32,
    start: usize,
    max_bits: Option<usize>,
) -> Result<(Vec<u8>, usize)> {
    let mut bits = Vec::new();
    let mut i = start;

    loop {
        if let Some(limit) = max_bits {
            if bits.len() >= limit {
                break;
            }
        }
        if i >= num_samples {
            if max_bits.is_some() {
                return Err(AppleTapeError::TruncatedBitStream { bits_read: bits.len() });
            }
            break;
        }

        let f = match demod.inferred_frequency(i) {
            Some(f) => f,
            None => {
                if max_bits.is_some() {
                    return Err(AppleTapeError::TruncatedBitStream { bits_read: bits.len() });
                }
                break;
            }
        };

        if f == LEADER_HZ || f == SYNC_HIGH_HZ {
            if max_bits.is_some() {
                return Err(AppleTapeError::TruncatedBitStream { bits_read: bits.len() });
            }
            break;
        }
        else if f == BIT_ONE_HZ || f == BIT_ONE_HIGH_HZ {
            bits.push(1);
        }
        else if f == BIT_ZERO_HZ || f == BIT_ZERO_HIGH_HZ {
            bits.push(0);
        }
        else {
            return Err(AppleTapeError::UnexpectedFrequency { hz: f as u32, sample: i });
        }

        i += (sample_rate as f64 / f).ceil() as usize;
    }

    Ok((bits, i))
}

/// A decoded cassette archive: the BASIC program bytes, any trailing data block, and
/// whether the length record asked the Apple II to auto-run the program.
pub struct DecodedArchive {
    pub program: Vec<u8>,
    pub data: Vec<u8>,
    pub auto_run: bool,
}

/// Demodulates `samples` and reconstructs the length/program/data block framing.
pub fn decode(samples: &[u8], sample_rate: u32) -> Result<DecodedArchive> {
    let demod = Demodulated::run(samples, sample_rate);
    let num_samples = samples.len();

    let leaders = demod.leader_starts();
    let leader0 = *leaders.first().ok_or(AppleTapeError::NoHeaderFound { which: 0 })?;
    log::debug!("decode: found leader #0 at sample {}", leader0);

    let sync0 = demod.find_sync_start(leader0).ok_or(AppleTapeError::NoHeaderFound { which: 0 })?;
    let length_body_start = sync0 + (sample_rate as f64 / 2250.0).ceil() as usize + 2;

    let (length_bits, _) = read_bit_stream(&demod, num_samples, sample_rate, length_body_start, None)?;
    let length_bytes = bits_to_bytes_validated(&length_bits, "length record")?;
    if length_bytes.len() != 3 {
        return Err(AppleTapeError::TruncatedBitStream { bits_read: length_bits.len() });
    }
    let program_length = u16::from_le_bytes([length_bytes[0], length_bytes[1]]) as usize;
    let auto_run = length_bytes[2] == 0xD5;
    log::debug!("decode: length record says {} program bytes, auto_run={}", program_length, auto_run);

    let leader1 = *leaders.get(1).ok_or(AppleTapeError::NoHeaderFound { which: 1 })?;
    let sync1 = demod.find_sync_start(leader1).ok_or(AppleTapeError::NoHeaderFound { which: 1 })?;
    let program_body_start = sync1 + (sample_rate as f64 / 2250.0).ceil() as usize + 2;

    let program_bits_needed = (program_length + 1) * 8;
    let (program_bits, after_program) =
        read_bit_stream(&demod, num_samples, sample_rate, program_body_start, Some(program_bits_needed))?;
    let program = bits_to_bytes_validated(&program_bits, "program record")?;
    log::debug!("decode: decoded {} program bytes", program.len());

    let data = read_optional_data_block(&demod, num_samples, sample_rate, after_program)?;

    Ok(DecodedArchive { program, data, auto_run })
}

fn read_optional_data_block(
    demod: &Demodulated,
    num_samples: usize,
    sample_rate: u32,
    after_program: usize,
) -> Result<Vec<u8>> {
    if after_program >= num_samples {
        return Ok(Vec::new());
    }

    let (_gap, after_gap) =
        read_bit_stream(demod, num_samples, sample_rate, after_program, Some(DATA_BLOCK_GAP_BITS))?;

    let (data_bits, _) = read_bit_stream(demod, num_samples, sample_rate, after_gap, None)?;
    if data_bits.is_empty() {
        return Ok(Vec::new());
    }

    let data = bits_to_bytes_validated(&data_bits, "data record")?;
    log::debug!("decode: decoded {} data bytes", data.len());
    Ok(data)
}
