use thiserror::Error;

use crate::huffman::MAX_CODE_BITS;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("code for symbol {symbol:#04x} needs {length} bits, more than the {max}-bit field", max = MAX_CODE_BITS)]
    CodeTooLong { symbol: u8, length: usize },

    #[error(transparent)]
    Stream(#[from] binary_rw::BinaryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("duplicate code {code} in symbol table")]
    DuplicateCode { code: String },

    #[error("payload bits match no code in the symbol table")]
    UnknownCode,

    #[error("payload ends in the middle of a code")]
    TruncatedPayload,

    #[error(transparent)]
    Stream(#[from] binary_rw::BinaryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
