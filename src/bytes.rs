// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Little-endian byte I/O, the XOR checksum, and MSB-first bit packing shared by the
//! tokenizer and the cassette codec.

use byteorder::{ByteOrder, LittleEndian};

use crate::errors::{checksum_error, out_of_range_error, AppleTapeError, Result};

/// Reads a 16-bit little-endian value at `index`. Fails if `index + 1 >= bytes.len()`.
pub fn read_u16_le(bytes: &[u8], index: usize) -> Result<u16> {
    if index + 1 >= bytes.len() {
        return out_of_range_error(index, bytes.len());
    }
    Ok(LittleEndian::read_u16(&bytes[index..index + 2]))
}

/// Writes a 16-bit little-endian value into `buf` at `index`.
pub fn write_u16_le(buf: &mut [u8], index: usize, value: u16) {
    LittleEndian::write_u16(&mut buf[index..index + 2], value);
}

/// Writes a 32-bit little-endian value into `buf` at `index`.
pub fn write_u32_le(buf: &mut [u8], index: usize, value: u32) {
    LittleEndian::write_u32(&mut buf[index..index + 4], value);
}

/// Writes a single byte into `buf` at `index`.
pub fn write_u8(buf: &mut [u8], index: usize, value: u8) {
    buf[index] = value;
}

/// Writes `text` into `buf[index..index + len]`, zero-padding the remainder.
///
/// Fails with `Overflow` if `text` is longer than `len`.
pub fn write_string_fixed(buf: &mut [u8], index: usize, len: usize, text: &[u8]) -> Result<()> {
    if text.len() > len {
        return Err(AppleTapeError::Overflow { needed: text.len(), got: len });
    }
    let field = &mut buf[index..index + len];
    field[..text.len()].copy_from_slice(text);
    for b in &mut field[text.len()..] {
        *b = 0;
    }
    Ok(())
}

/// XOR checksum seeded with `0xFF`, as used throughout the cassette format.
///
/// `xor_checksum(&[]) == 0xFF`, and appending the checksum of `bytes` to `bytes` always
/// folds back to `0x00`.
pub fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0xFF, |acc, &b| acc ^ b)
}

/// Splits `byte` into its 8 bits, most-significant bit first.
pub fn byte_to_bits(byte: u8) -> [u8; 8] {
    let mut bits = [0u8; 8];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (byte >> (7 - i)) & 1;
    }
    bits
}

/// Packs `bits` MSB-first into bytes, truncating any trailing partial byte.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1)))
        .collect()
}

/// Packs `bits` MSB-first into bytes and treats the final byte as the XOR checksum of
/// every byte before it, returning the bytes with the checksum stripped off.
///
/// Fails with `ChecksumMismatch` if the trailing byte does not match.
pub fn bits_to_bytes_validated(bits: &[u8], block: &'static str) -> Result<Vec<u8>> {
    let bytes = bits_to_bytes(bits);
    let (data, checksum) = match bytes.split_last() {
        Some((checksum, data)) => (data, *checksum),
        None => (&[][..], xor_checksum(&[])),
    };
    let expected = xor_checksum(data);
    if expected != checksum {
        return checksum_error(expected, checksum, block);
    }
    Ok(data.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_u16_le_round_trips() {
        let mut buf = [0u8; 2];
        write_u16_le(&mut buf, 0, 0xBEEF);
        assert_eq!(read_u16_le(&buf, 0).unwrap(), 0xBEEF);
    }

    #[test]
    fn read_u16_le_at_known_offset() {
        let buf = [0xDE, 0xAD, 0xEF, 0xBE];
        assert_eq!(read_u16_le(&buf, 2).unwrap(), 0xBEEF);
        assert!(read_u16_le(&buf, 3).is_err());
    }

    #[test]
    fn checksum_identity() {
        assert_eq!(xor_checksum(&[]), 0xFF);
        assert_eq!(xor_checksum(&[0xFF]), 0x00);

        // Appending a block's own checksum to itself and folding again always lands on
        // 0x00: the fold already cancelled every data byte, leaving checksum ^ checksum.
        let data = [1u8, 2, 3, 4, 5];
        let mut with_checksum = data.to_vec();
        with_checksum.push(xor_checksum(&data));
        assert_eq!(xor_checksum(&with_checksum), 0x00);
    }

    #[test]
    fn bit_packing_round_trips() {
        assert_eq!(byte_to_bits(0xCA), [1, 1, 0, 0, 1, 0, 1, 0]);
        for b in 0u8..=255 {
            let bits = byte_to_bits(b);
            assert_eq!(bits_to_bytes(&bits), vec![b]);
        }
    }

    #[test]
    fn bits_to_bytes_validated_detects_mismatch() {
        let data = [0x11u8, 0x22, 0x33];
        let mut bits: Vec<u8> = data.iter().flat_map(|&b| byte_to_bits(b)).collect();
        bits.extend(byte_to_bits(xor_checksum(&data)));
        assert_eq!(bits_to_bytes_validated(&bits, "test").unwrap(), data.to_vec());

        // Flip the checksum's low bit.
        let len = bits.len();
        bits[len - 1] ^= 1;
        assert!(bits_to_bytes_validated(&bits, "test").is_err());
    }

    #[test]
    fn write_string_fixed_pads_and_rejects_overflow() {
        let mut buf = [0xAAu8; 8];
        write_string_fixed(&mut buf, 0, 8, b"hi").unwrap();
        assert_eq!(&buf, b"hi\0\0\0\0\0\0");
        assert!(write_string_fixed(&mut buf, 0, 2, b"too long").is_err());
    }
}
