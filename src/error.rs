//! The functional core's fatal error taxonomy. Every variant is terminal:
//! none of these are recovered internally, matching the error handling
//! design the simulator is specified against.

use thiserror::Error;

/// Failures while turning a line of assembly into a [`crate::decode::DecodedLine`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("line {pc}: unknown opcode `{opcode}`")]
    UnknownOpcode { pc: usize, opcode: String },

    #[error("line {pc}: `{opcode}` expects {expected} operand(s), found {found}")]
    OperandCount {
        pc: usize,
        opcode: String,
        expected: usize,
        found: usize,
    },

    #[error("line {pc}: operand `{token}` is not a valid {shape}")]
    BadOperand {
        pc: usize,
        token: String,
        shape: &'static str,
    },

    #[error("line {pc}: register index {index} is out of range (must be < {max})")]
    RegisterOutOfRange { pc: usize, index: u32, max: u32 },
}

/// Out-of-range accesses to a register file or a memory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoundsError {
    #[error("memory access out of bounds at address {address} (size {size} words)")]
    Memory { address: u32, size: u32 },

    #[error("register index {index} out of bounds (register file holds {count})")]
    Register { index: usize, count: usize },
}

/// Arithmetic faults. Currently only division by zero, the single case the
/// specified instruction set can trigger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("line {pc}: division by zero in {opcode}")]
    DivisionByZero { pc: usize, opcode: &'static str },
}

/// Control-flow faults: the program counter escaped the program without a
/// clean halt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("program counter {pc} ran past the end of IMEM ({imem_len} instructions) without HALT")]
    RanOffEnd { pc: usize, imem_len: usize },

    #[error("infinite loop detected: program counter {pc} was unchanged after dispatch")]
    InfiniteLoop { pc: usize },

    #[error("program has {len} instructions, exceeding IMEM's capacity of {max}")]
    ImemOverflow { len: usize, max: usize },
}

/// The union of every way a functional run can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FunctionalError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
    #[error(transparent)]
    Control(#[from] ControlError),
}
