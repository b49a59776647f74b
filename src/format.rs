use std::collections::HashMap;

use crate::error::DecodeError;
use crate::huffman::Code;

pub const HEADER_BYTES: usize = 2;
pub const CODE_FIELD_BYTES: usize = 16;
pub const RECORD_BYTES: usize = 1 + CODE_FIELD_BYTES;

pub trait ToVec {
    fn to_vec(&self) -> Vec<u8>;
}

pub struct FileHeader {
    pub padding_bits: u8,
    pub unique_symbols: usize,
}

impl ToVec for FileHeader {
    fn to_vec(&self) -> Vec<u8> {
        // 256 unique symbols would not fit the count byte, it is aliased to 0.
        let count = if self.unique_symbols == 256 {
            0
        } else {
            self.unique_symbols as u8
        };
        vec![self.padding_bits, count]
    }
}

impl FileHeader {
    /// Parses the two leading bytes. `trailing` is the number of bytes after
    /// the header, which tells the empty archive (count byte 0, nothing else)
    /// apart from the aliased full 256-symbol alphabet.
    pub fn parse(data: &[u8], trailing: usize) -> Result<Self, DecodeError> {
        if data.len() < HEADER_BYTES {
            return Err(DecodeError::MalformedHeader(
                "file shorter than its header".into(),
            ));
        }

        let padding_bits = data[0];
        if padding_bits > 7 {
            return Err(DecodeError::MalformedHeader(format!(
                "padding bit count {padding_bits} out of range"
            )));
        }

        let unique_symbols = match data[1] {
            0 if trailing == 0 => 0,
            0 => 256,
            count => count as usize,
        };

        Ok(Self {
            padding_bits,
            unique_symbols,
        })
    }
}

pub struct SymbolCodeRecord {
    pub symbol: u8,
    pub code: Code,
}

impl ToVec for SymbolCodeRecord {
    fn to_vec(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(RECORD_BYTES);
        output.push(self.symbol);
        for bit in self.code.iter_bits() {
            output.push(b'0' + bit as u8);
        }
        output.resize(RECORD_BYTES, 0);
        output
    }
}

impl TryFrom<&[u8]> for SymbolCodeRecord {
    type Error = DecodeError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        if data.len() < RECORD_BYTES {
            return Err(DecodeError::MalformedHeader(
                "truncated symbol record".into(),
            ));
        }

        let symbol = data[0];
        let mut code = Code::default();
        for &byte in &data[1..RECORD_BYTES] {
            match byte {
                // Anything past the first NUL is filler and is ignored.
                0 => break,
                b'0' | b'1' => {
                    code = code.push(byte == b'1').ok_or_else(|| {
                        DecodeError::MalformedHeader(format!(
                            "code for symbol {symbol:#04x} overruns its field"
                        ))
                    })?;
                }
                other => {
                    return Err(DecodeError::MalformedHeader(format!(
                        "invalid code byte {other:#04x} for symbol {symbol:#04x}"
                    )));
                }
            }
        }

        if code.is_empty() {
            return Err(DecodeError::MalformedHeader(format!(
                "empty code for symbol {symbol:#04x}"
            )));
        }

        Ok(Self { symbol, code })
    }
}

/// Inverts the record list into the code -> symbol mapping used by the
/// bit unpacker. Two records sharing a code mean the file is corrupt.
pub fn invert_records(records: &[SymbolCodeRecord]) -> Result<HashMap<Code, u8>, DecodeError> {
    let mut codes = HashMap::with_capacity(records.len());
    for record in records {
        if codes.insert(record.code, record.symbol).is_some() {
            return Err(DecodeError::DuplicateCode {
                code: record.code.to_string(),
            });
        }
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_round_trip() {
        let bytes = FileHeader {
            padding_bits: 5,
            unique_symbols: 42,
        }
        .to_vec();
        assert_eq!(bytes, vec![5, 42]);

        let header = FileHeader::parse(&bytes, 42 * RECORD_BYTES).unwrap();
        assert_eq!(header.padding_bits, 5);
        assert_eq!(header.unique_symbols, 42);
    }

    #[test]
    fn test_full_alphabet_aliases_to_zero() {
        let bytes = FileHeader {
            padding_bits: 0,
            unique_symbols: 256,
        }
        .to_vec();
        assert_eq!(bytes, vec![0, 0]);

        let header = FileHeader::parse(&bytes, 256 * RECORD_BYTES + 1).unwrap();
        assert_eq!(header.unique_symbols, 256);
    }

    #[test]
    fn test_empty_archive_count_stays_zero() {
        let header = FileHeader::parse(&[0, 0], 0).unwrap();
        assert_eq!(header.unique_symbols, 0);
    }

    #[test]
    fn test_padding_out_of_range() {
        let result = FileHeader::parse(&[8, 1], 17);
        assert!(matches!(result, Err(DecodeError::MalformedHeader(_))));
    }

    #[test]
    fn test_record_round_trip() {
        let record = SymbolCodeRecord {
            symbol: b'Q',
            code: Code::new(0b01101, 5),
        };
        let bytes = record.to_vec();
        assert_eq!(bytes.len(), RECORD_BYTES);
        assert_eq!(&bytes[..6], b"Q01101");
        assert!(bytes[6..].iter().all(|&b| b == 0));

        let parsed = SymbolCodeRecord::try_from(&bytes[..]).unwrap();
        assert_eq!(parsed.symbol, b'Q');
        assert_eq!(parsed.code, Code::new(0b01101, 5));
    }

    #[test]
    fn test_full_width_code_fills_field() {
        let record = SymbolCodeRecord {
            symbol: 7,
            code: Code::new(0xABCD, 16),
        };
        let bytes = record.to_vec();
        let parsed = SymbolCodeRecord::try_from(&bytes[..]).unwrap();
        assert_eq!(parsed.code, Code::new(0xABCD, 16));
    }

    #[test]
    fn test_filler_after_terminator_is_ignored() {
        // A shorter code written over a longer one leaves residue past the
        // NUL, as the original writer did.
        let mut bytes = vec![b'A', b'0', b'1', 0, b'1', b'0', 0];
        bytes.resize(RECORD_BYTES, 0);
        let parsed = SymbolCodeRecord::try_from(&bytes[..]).unwrap();
        assert_eq!(parsed.code, Code::new(0b01, 2));
    }

    #[test]
    fn test_stray_byte_in_code_field() {
        let mut bytes = vec![b'A', b'0', b'2'];
        bytes.resize(RECORD_BYTES, 0);
        let result = SymbolCodeRecord::try_from(&bytes[..]);
        assert!(matches!(result, Err(DecodeError::MalformedHeader(_))));
    }

    #[test]
    fn test_empty_code_field() {
        let mut bytes = vec![b'A'];
        bytes.resize(RECORD_BYTES, 0);
        let result = SymbolCodeRecord::try_from(&bytes[..]);
        assert!(matches!(result, Err(DecodeError::MalformedHeader(_))));
    }

    #[test]
    fn test_duplicate_codes_rejected() {
        let records = vec![
            SymbolCodeRecord {
                symbol: b'a',
                code: Code::new(0, 1),
            },
            SymbolCodeRecord {
                symbol: b'b',
                code: Code::new(0, 1),
            },
        ];
        let result = invert_records(&records);
        assert!(matches!(result, Err(DecodeError::DuplicateCode { .. })));
    }

    #[test]
    fn test_invert_builds_reverse_mapping() {
        let records = vec![
            SymbolCodeRecord {
                symbol: b'a',
                code: Code::new(0, 1),
            },
            SymbolCodeRecord {
                symbol: b'b',
                code: Code::new(0b10, 2),
            },
        ];
        let codes = invert_records(&records).unwrap();
        assert_eq!(codes.get(&Code::new(0, 1)), Some(&b'a'));
        assert_eq!(codes.get(&Code::new(0b10, 2)), Some(&b'b'));
    }
}
