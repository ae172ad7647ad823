// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests exercising the public API as an outside caller would: source lines in,
//! a WAVE file out, and back again.

use appletape::{assemble, decode_wave, disassemble, encode_wave};

/// `try_init` is safe to call more than once. Run with `RUST_LOG=appletape=debug` to see
/// `decode_wave`'s progress through the length/program/data blocks.
fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

#[test]
fn program_survives_source_to_audio_to_source() {
    init_logger();
    let lines = ["10 PRINT \"HELLO\"", "20 GOTO 10"];

    let wave_bytes = encode_wave(&lines, true).unwrap();
    let decoded = decode_wave(&wave_bytes).unwrap();

    assert!(decoded.auto_run);
    assert!(decoded.data.is_empty());

    let rendered: Vec<String> =
        disassemble(&decoded.program).unwrap().into_iter().map(|l| l.full_text).collect();
    assert_eq!(rendered, vec!["10 PRINT \"HELLO\"".to_string(), "20 GOTO 10".to_string()]);
}

#[test]
fn multi_line_program_is_bit_exact_through_audio() {
    init_logger();
    let lines = [
        r#"1 LET X$ = "some value""#,
        "2 PRINT X$",
        r#"3 LET Y$ = X$ + "some other test""#,
        "4 PRINT Y$",
        "5 GOTO 1",
    ];

    let assembled = assemble(&lines).unwrap();
    let wave_bytes = encode_wave(&lines, false).unwrap();
    let decoded = decode_wave(&wave_bytes).unwrap();

    assert_eq!(decoded.program, assembled);
    assert!(!decoded.auto_run);
}

#[test]
fn wave_file_carries_a_valid_riff_header() {
    let wave_bytes = encode_wave(&["1 END"], true).unwrap();
    assert_eq!(&wave_bytes[0..4], b"RIFF");
    assert_eq!(&wave_bytes[8..12], b"WAVE");
}

#[test]
fn truncated_wave_file_is_rejected() {
    let wave_bytes = encode_wave(&["1 END"], true).unwrap();
    let truncated = &wave_bytes[..wave_bytes.len() / 2];
    assert!(decode_wave(truncated).is_err());
}

#[test]
fn rejects_a_line_number_past_the_limit() {
    assert!(assemble(&["64000 END"]).is_err());
}
