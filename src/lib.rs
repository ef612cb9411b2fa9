pub mod constants;
pub mod decode;
pub mod error;
pub mod interp;
pub mod memory;
pub mod opcode;
pub mod program;
pub mod register_file;
pub mod trace;

/// The machine word: every register lane, memory cell and immediate is one
/// 32-bit word, interpreted as signed or unsigned depending on the opcode.
pub type Word = u32;
