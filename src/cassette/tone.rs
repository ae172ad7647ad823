// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sine-wave tone synthesis and FSK-style bit encoding shared by the cassette encoder.

use std::f64::consts::PI;

use crate::bytes::byte_to_bits;

/// Peak amplitude (above or below the 128 midline) of a generated tone.
pub const AMPLITUDE: f64 = 93.0;
/// The midline value of an 8-bit unsigned PCM sample.
pub const MIDLINE: f64 = 128.0;

/// `1` bit frequency in low-frequency (program block) mode.
pub const BIT_ONE_HZ: f64 = 1000.0;
/// `0` bit frequency in low-frequency (program block) mode.
pub const BIT_ZERO_HZ: f64 = 2000.0;
/// `1` bit frequency in high-frequency (data block) mode.
pub const BIT_ONE_HIGH_HZ: f64 = 6000.0;
/// `0` bit frequency in high-frequency (data block) mode.
pub const BIT_ZERO_HIGH_HZ: f64 = 12000.0;

pub const LEADER_HZ: f64 = 770.0;
pub const LEADER_CYCLES: f64 = 3080.0;
pub const SYNC_HIGH_HZ: f64 = 2500.0;
pub const SYNC_LOW_HZ: f64 = 2000.0;
pub const TRAILING_LOW_CYCLES: f64 = 10.0;
pub const TRAILING_LEADER_CYCLES: f64 = 10.0;

/// The frequencies the demodulator recognizes as meaningful, used to snap a noisy
/// zero-crossing measurement to its nearest intended value.
pub const KNOWN_FREQUENCIES: [f64; 8] = [770.0, 1000.0, 1500.0, 2000.0, 2250.0, 2500.0, 6000.0, 12000.0];

/// A single constant-frequency tone segment of the cassette signal.
pub struct Tone {
    pub frequency: f64,
    pub cycles: f64,
    pub invert: bool,
}

impl Tone {
    pub fn new(frequency: f64, cycles: f64) -> Self {
        Tone { frequency, cycles, invert: false }
    }

    pub fn inverted(frequency: f64, cycles: f64) -> Self {
        Tone { frequency, cycles, invert: true }
    }

    /// The number of samples this tone occupies at `sample_rate`.
    pub fn num_samples(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 / (self.frequency / self.cycles)).ceil() as usize
    }

    /// Appends this tone's samples to `out`.
    pub fn write(&self, out: &mut Vec<u8>, sample_rate: u32) {
        let n = self.num_samples(sample_rate);
        let phase_offset = if self.invert {
            (sample_rate as f64 / (self.frequency / 0.5)).ceil()
        }
        else {
            0.0
        };
        for i in 0..n {
            let angle = 2.0 * PI * self.frequency * (i as f64 + phase_offset) / sample_rate as f64;
            let value = (angle.sin() * AMPLITUDE).round() + MIDLINE;
            out.push(value as u8);
        }
    }
}

/// Encodes `buffer` as a stream of full-cycle tones, one per bit, most-significant bit
/// first within each byte. `high_freq` selects 6000/12000 Hz over 1000/2000 Hz.
pub fn encode_bits(out: &mut Vec<u8>, buffer: &[u8], high_freq: bool, sample_rate: u32) {
    let (one_hz, zero_hz) =
        if high_freq { (BIT_ONE_HIGH_HZ, BIT_ZERO_HIGH_HZ) } else { (BIT_ONE_HZ, BIT_ZERO_HZ) };
    for &byte in buffer {
        for bit in byte_to_bits(byte) {
            let hz = if bit == 1 { one_hz } else { zero_hz };
            Tone::new(hz, 1.0).write(out, sample_rate);
        }
    }
}
