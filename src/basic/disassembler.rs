// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recovers BASIC source text from a tokenized program image. The inverse of
//! [`crate::basic::assembler`].

use crate::basic::assembler::LOAD_ADDRESS;
use crate::basic::atom::Line;
use crate::bytes::read_u16_le;
use crate::errors::{AppleTapeError, Result};
use crate::opcodes::TABLE;

/// Renders one line body (the bytes between the line number and the trailing null/padding
/// byte) into text, wrapping each decoded opcode in single spaces and passing through
/// everything else as an ASCII character, then collapsing doubled spaces and trimming.
fn render_body(body: &[u8]) -> String {
    let mut text = String::with_capacity(body.len() + 8);
    for &b in body {
        match TABLE.mnemonic_for(b) {
            Some(mnemonic) => {
                text.push(' ');
                text.push_str(mnemonic);
                text.push(' ');
            }
            None => {
                if b == 0 {
                    continue;
                }
                text.push(b as char);
            }
        }
    }
    while text.contains("  ") {
        text = text.replace("  ", " ");
    }
    text.trim().to_string()
}

/// Disassembles a tokenized program image back into source lines.
///
/// Stops (without error) at the first `0x00 0x00` end-of-program marker. If a line's
/// next-line address points backwards, logs a warning and returns the lines decoded so
/// far — this is the sole soft-error recovery path in the crate.
pub fn disassemble(bytes: &[u8]) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    let mut current_address = LOAD_ADDRESS;

    loop {
        let idx = (current_address - LOAD_ADDRESS) as usize;
        if idx >= bytes.len() {
            break;
        }

        let next_address = read_u16_le(bytes, idx)?;
        if next_address == 0 {
            break;
        }
        if next_address < current_address {
            log::warn!(
                "disassemble: next-line address {:#06x} precedes current address {:#06x}, stopping",
                next_address,
                current_address
            );
            break;
        }

        let instruction_length = (next_address - current_address) as usize;
        if idx + instruction_length > bytes.len() {
            return Err(AppleTapeError::TruncatedInput);
        }
        let line_bytes = &bytes[idx..idx + instruction_length];
        if line_bytes.len() < 5 {
            return Err(AppleTapeError::TruncatedInput);
        }

        let line_number = read_u16_le(line_bytes, 2)?;
        // Drop the trailing null and the extra byte introduced by the encoder's off-by-one.
        let body = &line_bytes[4..line_bytes.len() - 2];
        let text_after_number = render_body(body);
        let full_text = format!("{} {}", line_number, text_after_number);

        lines.push(Line { number: line_number, text_after_number, full_text });

        // Undo the encoder's off-by-one (see `assemble_line`).
        current_address = next_address - 1;
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::assembler::assemble;

    /// `try_init` is safe to call more than once; this test is the one that exercises the
    /// `warn!` soft-error path below. Run with `RUST_LOG=appletape=warn` to see it fire.
    fn init_logger() {
        let _ = pretty_env_logger::try_init();
    }

    #[test]
    fn rejects_backwards_next_address_with_empty_result() {
        init_logger();
        let bytes = [0x00, 0x01, 0x12, 0x01, 0x00];
        assert_eq!(disassemble(&bytes).unwrap(), vec![]);
    }

    #[test]
    fn rem_round_trips() {
        let lines = [r#"1 REM Eat "your" = vegetables"#];
        let program = assemble(&lines).unwrap();
        let decoded = disassemble(&program).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].full_text, lines[0]);
    }

    #[test]
    fn string_assignment_round_trips() {
        let lines = [r#"1 LET X$ = "some value""#];
        let program = assemble(&lines).unwrap();
        let decoded = disassemble(&program).unwrap();
        assert_eq!(decoded[0].full_text, lines[0]);
    }

    #[test]
    fn multi_line_program_round_trips() {
        let lines = [
            r#"1 LET X$ = "some value""#,
            "2 PRINT X$",
            r#"3 LET Y$ = X$ + "some other test""#,
            "4 PRINT Y$",
            "5 GOTO 1",
        ];
        let program = assemble(&lines).unwrap();
        let decoded = disassemble(&program).unwrap();
        let rendered: Vec<String> = decoded.iter().map(|l| l.full_text.clone()).collect();
        assert_eq!(rendered, lines.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }
}
