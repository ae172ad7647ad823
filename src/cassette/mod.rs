// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The cassette audio codec: synthesizes and demodulates the PCM signal the Apple II
//! cassette interface reads and writes.

pub mod decoder;
pub mod encoder;
pub mod tone;

pub use decoder::DecodedArchive;

use crate::basic::assemble;
use crate::errors::Result;
use crate::wave;

/// Assembles `lines` and encodes them as a complete WAVE file: PCM, 8-bit unsigned, mono,
/// at [`wave::DEFAULT_SAMPLE_RATE`].
pub fn encode_wave(lines: &[impl AsRef<str>], auto_run: bool) -> Result<Vec<u8>> {
    let program = assemble(lines)?;
    let samples = encoder::encode(&program, &[], auto_run, wave::DEFAULT_SAMPLE_RATE);
    Ok(wave::write(&samples, wave::DEFAULT_SAMPLE_RATE))
}

/// Decodes a WAVE file back into the tokenized program bytes (and any trailing data
/// block), honoring the sample rate declared in the WAVE header rather than assuming the
/// encoder's default.
pub fn decode_wave(wave_bytes: &[u8]) -> Result<DecodedArchive> {
    let file = wave::read(wave_bytes)?;
    decoder::decode(&file.samples, file.sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::assemble;

    /// `try_init` is safe to call more than once, so no `Once`/`LazyLock` guard is needed —
    /// every test that wants to see `decode`'s `debug!`/`warn!` output just calls this
    /// first. Run with `RUST_LOG=appletape=debug` to see it.
    fn init_logger() {
        let _ = pretty_env_logger::try_init();
    }

    #[test]
    fn full_audio_round_trip() {
        init_logger();
        let lines = [
            r#"1 LET X$ = "some value""#,
            "2 PRINT X$",
            r#"3 LET Y$ = X$ + "some other test""#,
            "4 PRINT Y$",
            "5 GOTO 1",
        ];
        let expected = assemble(&lines).unwrap();

        let wave_bytes = encode_wave(&lines, true).unwrap();
        let decoded = decode_wave(&wave_bytes).unwrap();

        assert_eq!(decoded.program, expected);
        assert!(decoded.auto_run);
    }

    #[test]
    fn auto_run_false_round_trips() {
        init_logger();
        let lines = ["1 END"];
        let wave_bytes = encode_wave(&lines, false).unwrap();
        let decoded = decode_wave(&wave_bytes).unwrap();
        assert!(!decoded.auto_run);
    }

    #[test]
    fn checksum_failure_is_detected() {
        init_logger();
        let lines = ["1 END"];
        let wave_bytes = encode_wave(&lines, true).unwrap();

        // The leader tones dwarf the program block's bit stream (thousands of samples of
        // uniform 770 Hz versus a couple hundred samples of actual data), so corrupting a
        // fraction of the whole file almost always lands in a leader, which tolerates
        // noise. Target the last stretch before the trailing tail tones instead, where the
        // program record's bits live.
        let mut corrupted = wave_bytes.clone();
        let len = corrupted.len();
        let start = len - 2000;
        let end = len - 1000;
        for sample in &mut corrupted[start..end] {
            *sample = 128; // flatline: erases the zero crossings the demodulator reads
        }
        assert!(decode_wave(&corrupted).is_err());
    }
}
