mod code;
mod freq;
mod tree;

pub use code::{Code, CodeTable, MAX_CODE_BITS};
pub use freq::FrequencyTable;
pub use tree::{build_tree, HuffNode};
