use std::fmt;

use crate::error::EncodeError;

use super::{FrequencyTable, HuffNode};

/// Widest code the fixed-width table record can hold.
pub const MAX_CODE_BITS: usize = 16;

/// A prefix code of 1-16 bits. The first branch taken from the root is the
/// most significant stored bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct Code {
    bits: u16,
    len: u8,
}

impl Code {
    pub fn new(bits: u16, len: u8) -> Self {
        Self { bits, len }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends one bit, or `None` once the field capacity is exhausted.
    pub fn push(self, bit: bool) -> Option<Self> {
        if self.len() == MAX_CODE_BITS {
            return None;
        }
        Some(Self {
            bits: (self.bits << 1) | bit as u16,
            len: self.len + 1,
        })
    }

    /// Bits from first branch to last.
    pub fn iter_bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).rev().map(move |i| (self.bits >> i) & 1 == 1)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter_bits() {
            write!(f, "{}", bit as u8)?;
        }
        Ok(())
    }
}

pub struct CodeTable {
    codes: [Option<Code>; 256],
}

impl CodeTable {
    /// Derives the symbol -> code mapping by depth-first traversal, 0 for a
    /// left branch and 1 for a right branch. A leaf deeper than
    /// `MAX_CODE_BITS` fails the whole operation.
    ///
    /// A bare leaf root (single distinct symbol) gets the one-bit code `0`,
    /// as if it hung off the left branch of a synthesized root.
    pub fn from_tree(root: &HuffNode) -> Result<Self, EncodeError> {
        let mut table = Self {
            codes: [None; 256],
        };

        match root {
            HuffNode::Leaf { symbol, .. } => {
                table.codes[*symbol as usize] = Some(Code::new(0, 1));
            }
            HuffNode::Internal { left, right, .. } => {
                Self::walk(left, 0, 1, &mut table)?;
                Self::walk(right, 1, 1, &mut table)?;
            }
        }

        Ok(table)
    }

    fn walk(node: &HuffNode, bits: u32, len: usize, table: &mut Self) -> Result<(), EncodeError> {
        match node {
            HuffNode::Leaf { symbol, .. } => {
                if len > MAX_CODE_BITS {
                    return Err(EncodeError::CodeTooLong {
                        symbol: *symbol,
                        length: len,
                    });
                }
                table.codes[*symbol as usize] = Some(Code::new(bits as u16, len as u8));
                Ok(())
            }
            HuffNode::Internal { left, right, .. } => {
                // High bits shifted out past the capacity check never reach a
                // stored code, the first too-deep leaf errors out before that.
                Self::walk(left, bits << 1, len + 1, table)?;
                Self::walk(right, (bits << 1) | 1, len + 1, table)
            }
        }
    }

    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    /// Entries in ascending symbol order, which is also the on-disk record
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|code| (symbol as u8, code)))
    }

    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .map(|(symbol, count)| {
                let length = self.get(symbol).map(|code| code.len()).unwrap_or(0);
                count * length as u64
            })
            .sum()
    }

    /// Unused trailing bits of the final payload byte.
    pub fn padding_bits(&self, frequencies: &FrequencyTable) -> u8 {
        ((8 - self.encoded_bits(frequencies) % 8) % 8) as u8
    }
}
