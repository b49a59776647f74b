use std::collections::HashMap;
use std::io::Cursor;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::error::{DecodeError, EncodeError};
use crate::huffman::{Code, CodeTable};

/// Packs each symbol's code into the payload, most significant bit first.
/// A final partial byte is flushed with zero bits in the unused positions.
pub fn pack_payload(data: &[u8], table: &CodeTable) -> Result<Vec<u8>, EncodeError> {
    let mut payload = Vec::new();
    let mut writer = BitWriter::endian(Cursor::new(&mut payload), BigEndian);

    for &symbol in data {
        // Every input symbol has an entry, the table was built from this data.
        let code = table.get(symbol).unwrap();
        for bit in code.iter_bits() {
            writer.write_bit(bit)?;
        }
    }
    writer.byte_align()?;
    drop(writer);

    Ok(payload)
}

/// Walks the payload bits, matching the growing candidate against the
/// inverse table. Codes are prefix-free so the first match is the symbol.
/// The last `padding_bits` bits of the final byte are discarded.
pub fn unpack_payload(
    payload: &[u8],
    padding_bits: u8,
    codes: &HashMap<Code, u8>,
) -> Result<Vec<u8>, DecodeError> {
    if payload.is_empty() {
        return if codes.is_empty() {
            Ok(Vec::new())
        } else {
            Err(DecodeError::TruncatedPayload)
        };
    }

    let total_bits = payload.len() as u64 * 8 - padding_bits as u64;
    let mut reader = BitReader::endian(Cursor::new(payload), BigEndian);

    let mut output = Vec::new();
    let mut candidate = Code::default();
    for _ in 0..total_bits {
        let bit = reader.read_bit()?;
        candidate = candidate.push(bit).ok_or(DecodeError::UnknownCode)?;
        if let Some(&symbol) = codes.get(&candidate) {
            output.push(symbol);
            candidate = Code::default();
        }
    }

    if !candidate.is_empty() {
        return Err(DecodeError::TruncatedPayload);
    }

    Ok(output)
}
