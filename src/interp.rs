//! The functional interpreter: executes decoded lines against register and
//! memory state, producing the resolved trace the timing core replays.

use crate::constants::MVL;
use crate::decode::decode_line;
use crate::error::{ArithmeticError, ControlError, FunctionalError};
use crate::memory::{Storage, WordMemory};
use crate::opcode::Opcode;
use crate::register_file::{Srf, Vlr, Vmr, Vrf};
use crate::trace::ResolvedInstruction;
use crate::Word;

const LANES: usize = MVL as usize;

/// The architectural state a functional run operates on and, on success or
/// failure alike, leaves behind for inspection.
pub struct Interpreter {
    pub srf: Srf,
    pub vrf: Vrf,
    pub vmr: Vmr,
    pub vlr: Vlr,
}

impl Interpreter {
    /// Constructs an interpreter in its architectural initial state: SRF and
    /// VRF zeroed, VMR all ones, VLR at MVL.
    pub fn new() -> Self {
        Interpreter {
            srf: Srf::new(),
            vrf: Vrf::new(),
            vmr: Vmr::new_all_ones(),
            vlr: Vlr::new(),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

/// Where a failed run stopped, and why.
#[derive(Debug)]
pub struct FailureAt {
    pub pc: usize,
    pub error: FunctionalError,
}

/// The result of running a program to completion or to a fatal error.
///
/// `interp`, `sdmem` and `vdmem` are always left holding the state as of the
/// last instruction that executed, whether or not the run ultimately
/// succeeded — callers dump architectural state unconditionally.
pub struct RunOutcome {
    pub trace: Vec<ResolvedInstruction>,
    pub result: Result<(), FailureAt>,
}

/// Runs `program` (already-stripped assembly lines, one per IMEM slot)
/// against `interp`, `sdmem` and `vdmem`, mutating all three in place.
///
/// Stops on `HALT` (success), on the first fatal error, on a program counter
/// that runs off the end of `program` without halting, or on a dispatch that
/// leaves the program counter unchanged (an infinite loop). A `program`
/// exceeding IMEM's capacity ([`crate::constants::IMEM_MAX`]) is rejected
/// before the first instruction runs.
pub fn run(
    program: &[String],
    interp: &mut Interpreter,
    sdmem: &mut WordMemory,
    vdmem: &mut WordMemory,
) -> RunOutcome {
    if program.len() > crate::constants::IMEM_MAX {
        return RunOutcome {
            trace: Vec::new(),
            result: Err(FailureAt {
                pc: 0,
                error: ControlError::ImemOverflow {
                    len: program.len(),
                    max: crate::constants::IMEM_MAX,
                }
                .into(),
            }),
        };
    }

    let mut trace = Vec::new();
    let mut pc: usize = 0;

    loop {
        if pc >= program.len() {
            let error = FunctionalError::Control(ControlError::RanOffEnd {
                pc,
                imem_len: program.len(),
            });
            return RunOutcome {
                trace,
                result: Err(FailureAt { pc, error }),
            };
        }

        let decoded = match decode_line(pc, &program[pc]) {
            Ok(d) => d,
            Err(error) => {
                return RunOutcome {
                    trace,
                    result: Err(FailureAt {
                        pc,
                        error: error.into(),
                    }),
                };
            }
        };

        let outcome = execute(&decoded, interp, sdmem, vdmem);

        match outcome {
            Ok(ExecOutcome::Continue(resolved)) => {
                trace.push(resolved);
                let next = pc + 1;
                if next == pc {
                    unreachable!("pc + 1 always differs from pc");
                }
                pc = next;
            }
            Ok(ExecOutcome::Branch(resolved, target)) => {
                trace.push(resolved);
                let next_pc = if target < 0 {
                    usize::MAX
                } else {
                    target as usize
                };
                if next_pc == pc {
                    return RunOutcome {
                        trace,
                        result: Err(FailureAt {
                            pc,
                            error: ControlError::InfiniteLoop { pc }.into(),
                        }),
                    };
                }
                pc = next_pc;
            }
            Ok(ExecOutcome::Halt(resolved)) => {
                trace.push(resolved);
                return RunOutcome {
                    trace,
                    result: Ok(()),
                };
            }
            Err(error) => {
                return RunOutcome {
                    trace,
                    result: Err(FailureAt { pc, error }),
                };
            }
        }
    }
}

enum ExecOutcome {
    Continue(ResolvedInstruction),
    Branch(ResolvedInstruction, i64),
    Halt(ResolvedInstruction),
}

/// Gates writes into a vector destination by the mask & VL write rule: a
/// lane in `[0, vlr)` is overwritten only when `vmr`'s corresponding lane is
/// 1; every other lane retains its prior value.
fn write_vector_masked(
    dest: &mut [Word; LANES],
    vlr: u32,
    vmr: &[Word; LANES],
    mut compute: impl FnMut(usize) -> Word,
) {
    for i in 0..LANES {
        if (i as u32) < vlr && vmr[i] == 1 {
            dest[i] = compute(i);
        }
    }
}

/// The write rule for mask-producing comparisons: unmasked, so every lane in
/// `[0, vlr)` is overwritten with the predicate and every lane in
/// `[vlr, MVL)` is forced to 0.
fn write_vmr_unmasked(dest: &mut [Word; LANES], vlr: u32, mut predicate: impl FnMut(usize) -> Word) {
    for i in 0..LANES {
        dest[i] = if (i as u32) < vlr { predicate(i) } else { 0 };
    }
}

fn arithmetic_right_shift(value: Word, amount: Word) -> Word {
    ((value as i32) >> (amount & 31)) as Word
}

fn logical_right_shift(value: Word, amount: Word) -> Word {
    value >> (amount & 31)
}

fn logical_left_shift(value: Word, amount: Word) -> Word {
    value << (amount & 31)
}

fn checked_div(
    pc: usize,
    opcode: &'static str,
    a: i32,
    b: i32,
) -> Result<i32, ArithmeticError> {
    if b == 0 {
        Err(ArithmeticError::DivisionByZero { pc, opcode })
    } else {
        Ok(a.wrapping_div(b))
    }
}

fn execute(
    decoded: &crate::decode::DecodedLine,
    interp: &mut Interpreter,
    sdmem: &mut WordMemory,
    vdmem: &mut WordMemory,
) -> Result<ExecOutcome, FunctionalError> {
    let pc = decoded.pc;
    let ops = &decoded.operands;
    let plain = || ResolvedInstruction::plain(decoded.tokens.clone());

    macro_rules! vv_arith {
        ($f:expr) => {{
            let dest = ops[0].as_vr();
            let x = *interp.vrf.read(ops[1].as_vr())?;
            let y = *interp.vrf.read(ops[2].as_vr())?;
            let vlr = interp.vlr.get();
            let vmr = *interp.vmr.read(0)?;
            let mut z = *interp.vrf.read(dest)?;
            let f: fn(i32, i32) -> i32 = $f;
            write_vector_masked(&mut z, vlr, &vmr, |i| f(x[i] as i32, y[i] as i32) as Word);
            interp.vrf.write(dest, z)?;
            Ok(ExecOutcome::Continue(plain()))
        }};
    }

    macro_rules! vv_div {
        () => {{
            let dest = ops[0].as_vr();
            let x = *interp.vrf.read(ops[1].as_vr())?;
            let y = *interp.vrf.read(ops[2].as_vr())?;
            let vlr = interp.vlr.get();
            let vmr = *interp.vmr.read(0)?;
            let mut z = *interp.vrf.read(dest)?;
            for i in 0..LANES {
                if (i as u32) < vlr {
                    let quotient = checked_div(pc, "DIVVV", x[i] as i32, y[i] as i32)? as Word;
                    if vmr[i] == 1 {
                        z[i] = quotient;
                    }
                }
            }
            interp.vrf.write(dest, z)?;
            Ok(ExecOutcome::Continue(plain()))
        }};
    }

    macro_rules! vs_arith {
        ($f:expr) => {{
            let dest = ops[0].as_vr();
            let x = *interp.vrf.read(ops[1].as_vr())?;
            let s = interp.srf.read_scalar(ops[2].as_sr())?;
            let vlr = interp.vlr.get();
            let vmr = *interp.vmr.read(0)?;
            let mut z = *interp.vrf.read(dest)?;
            let f: fn(i32, i32) -> i32 = $f;
            write_vector_masked(&mut z, vlr, &vmr, |i| f(x[i] as i32, s as i32) as Word);
            interp.vrf.write(dest, z)?;
            Ok(ExecOutcome::Continue(plain()))
        }};
    }

    macro_rules! vs_div {
        () => {{
            let dest = ops[0].as_vr();
            let x = *interp.vrf.read(ops[1].as_vr())?;
            let s = interp.srf.read_scalar(ops[2].as_sr())?;
            let vlr = interp.vlr.get();
            let vmr = *interp.vmr.read(0)?;
            let mut z = *interp.vrf.read(dest)?;
            for i in 0..LANES {
                if (i as u32) < vlr {
                    let quotient = checked_div(pc, "DIVVS", x[i] as i32, s as i32)? as Word;
                    if vmr[i] == 1 {
                        z[i] = quotient;
                    }
                }
            }
            interp.vrf.write(dest, z)?;
            Ok(ExecOutcome::Continue(plain()))
        }};
    }

    macro_rules! vv_cmp {
        ($f:expr) => {{
            let x = *interp.vrf.read(ops[0].as_vr())?;
            let y = *interp.vrf.read(ops[1].as_vr())?;
            let vlr = interp.vlr.get();
            let mut m = *interp.vmr.read(0)?;
            let f: fn(i32, i32) -> bool = $f;
            write_vmr_unmasked(&mut m, vlr, |i| f(x[i] as i32, y[i] as i32) as Word);
            interp.vmr.write(0, m)?;
            Ok(ExecOutcome::Continue(plain()))
        }};
    }

    macro_rules! vs_cmp {
        ($f:expr) => {{
            let x = *interp.vrf.read(ops[0].as_vr())?;
            let s = interp.srf.read_scalar(ops[1].as_sr())?;
            let vlr = interp.vlr.get();
            let mut m = *interp.vmr.read(0)?;
            let f: fn(i32, i32) -> bool = $f;
            write_vmr_unmasked(&mut m, vlr, |i| f(x[i] as i32, s as i32) as Word);
            interp.vmr.write(0, m)?;
            Ok(ExecOutcome::Continue(plain()))
        }};
    }

    macro_rules! scalar_alu {
        ($f:expr) => {{
            let dest = ops[0].as_sr();
            let a = interp.srf.read_scalar(ops[1].as_sr())?;
            let b = interp.srf.read_scalar(ops[2].as_sr())?;
            let f: fn(Word, Word) -> Word = $f;
            interp.srf.write_scalar(dest, f(a, b))?;
            Ok(ExecOutcome::Continue(plain()))
        }};
    }

    macro_rules! branch {
        ($f:expr) => {{
            let sx = interp.srf.read_scalar(ops[0].as_sr())? as i32;
            let sy = interp.srf.read_scalar(ops[1].as_sr())? as i32;
            let imm = ops[2].as_imm();
            let f: fn(i32, i32) -> bool = $f;
            if f(sx, sy) {
                Ok(ExecOutcome::Branch(plain(), pc as i64 + imm as i64))
            } else {
                Ok(ExecOutcome::Continue(plain()))
            }
        }};
    }

    match decoded.opcode {
        Opcode::ADDVV => vv_arith!(|a, b| a.wrapping_add(b)),
        Opcode::SUBVV => vv_arith!(|a, b| a.wrapping_sub(b)),
        Opcode::MULVV => vv_arith!(|a, b| a.wrapping_mul(b)),
        Opcode::DIVVV => vv_div!(),

        Opcode::SEQVV => vv_cmp!(|a, b| a == b),
        Opcode::SNEVV => vv_cmp!(|a, b| a != b),
        Opcode::SGTVV => vv_cmp!(|a, b| a > b),
        Opcode::SLTVV => vv_cmp!(|a, b| a < b),
        Opcode::SGEVV => vv_cmp!(|a, b| a >= b),
        Opcode::SLEVV => vv_cmp!(|a, b| a <= b),

        Opcode::ADDVS => vs_arith!(|a, b| a.wrapping_add(b)),
        Opcode::SUBVS => vs_arith!(|a, b| a.wrapping_sub(b)),
        Opcode::MULVS => vs_arith!(|a, b| a.wrapping_mul(b)),
        Opcode::DIVVS => vs_div!(),

        Opcode::SEQVS => vs_cmp!(|a, b| a == b),
        Opcode::SNEVS => vs_cmp!(|a, b| a != b),
        Opcode::SGTVS => vs_cmp!(|a, b| a > b),
        Opcode::SLTVS => vs_cmp!(|a, b| a < b),
        Opcode::SGEVS => vs_cmp!(|a, b| a >= b),
        Opcode::SLEVS => vs_cmp!(|a, b| a <= b),

        Opcode::CVM => {
            interp.vmr.write(0, [1; LANES])?;
            Ok(ExecOutcome::Continue(plain()))
        }

        Opcode::POP => {
            let dest = ops[0].as_sr();
            let m = *interp.vmr.read(0)?;
            let count = m.iter().filter(|&&bit| bit == 1).count() as Word;
            interp.srf.write_scalar(dest, count)?;
            Ok(ExecOutcome::Continue(plain()))
        }

        Opcode::MTCL => {
            let value = interp.srf.read_scalar(ops[0].as_sr())?;
            interp.vlr.set(value);
            Ok(ExecOutcome::Continue(ResolvedInstruction::with_plain_value(
                decoded.tokens.clone(),
                interp.vlr.get(),
            )))
        }

        Opcode::MFCL => {
            let dest = ops[0].as_sr();
            interp.srf.write_scalar(dest, interp.vlr.get())?;
            Ok(ExecOutcome::Continue(plain()))
        }

        Opcode::LV => {
            let dest = ops[0].as_vr();
            let base = interp.srf.read_scalar(ops[1].as_sr())?;
            let vlr = interp.vlr.get();
            let vmr = *interp.vmr.read(0)?;
            let mut addresses = Vec::with_capacity(vlr as usize);
            let mut loaded = [0 as Word; LANES];
            for i in 0..(vlr as usize) {
                let addr = base.wrapping_add(i as Word);
                addresses.push(addr);
                loaded[i] = vdmem.read(addr)?;
            }
            let mut z = *interp.vrf.read(dest)?;
            write_vector_masked(&mut z, vlr, &vmr, |i| loaded[i]);
            interp.vrf.write(dest, z)?;
            Ok(ExecOutcome::Continue(ResolvedInstruction::with_addresses(
                decoded.tokens.clone(),
                &addresses,
            )))
        }

        Opcode::SV => {
            let src = ops[0].as_vr();
            let base = interp.srf.read_scalar(ops[1].as_sr())?;
            let vlr = interp.vlr.get();
            let vmr = *interp.vmr.read(0)?;
            let data = *interp.vrf.read(src)?;
            let mut addresses = Vec::with_capacity(vlr as usize);
            for i in 0..(vlr as usize) {
                let addr = base.wrapping_add(i as Word);
                addresses.push(addr);
                if vmr[i] == 1 {
                    vdmem.write(addr, data[i])?;
                }
            }
            Ok(ExecOutcome::Continue(ResolvedInstruction::with_addresses(
                decoded.tokens.clone(),
                &addresses,
            )))
        }

        Opcode::LVWS => {
            let dest = ops[0].as_vr();
            let base = interp.srf.read_scalar(ops[1].as_sr())?;
            let stride = interp.srf.read_scalar(ops[2].as_sr())? as i32;
            let vlr = interp.vlr.get();
            let vmr = *interp.vmr.read(0)?;
            let mut addresses = Vec::with_capacity(vlr as usize);
            let mut loaded = [0 as Word; LANES];
            for i in 0..(vlr as usize) {
                let addr = (base as i32).wrapping_add(stride.wrapping_mul(i as i32)) as Word;
                addresses.push(addr);
                loaded[i] = vdmem.read(addr)?;
            }
            let mut z = *interp.vrf.read(dest)?;
            write_vector_masked(&mut z, vlr, &vmr, |i| loaded[i]);
            interp.vrf.write(dest, z)?;
            Ok(ExecOutcome::Continue(ResolvedInstruction::with_addresses(
                decoded.tokens.clone(),
                &addresses,
            )))
        }

        Opcode::SVWS => {
            let src = ops[0].as_vr();
            let base = interp.srf.read_scalar(ops[1].as_sr())?;
            let stride = interp.srf.read_scalar(ops[2].as_sr())? as i32;
            let vlr = interp.vlr.get();
            let vmr = *interp.vmr.read(0)?;
            let data = *interp.vrf.read(src)?;
            let mut addresses = Vec::with_capacity(vlr as usize);
            for i in 0..(vlr as usize) {
                let addr = (base as i32).wrapping_add(stride.wrapping_mul(i as i32)) as Word;
                addresses.push(addr);
                if vmr[i] == 1 {
                    vdmem.write(addr, data[i])?;
                }
            }
            Ok(ExecOutcome::Continue(ResolvedInstruction::with_addresses(
                decoded.tokens.clone(),
                &addresses,
            )))
        }

        Opcode::LVI => {
            let dest = ops[0].as_vr();
            let base = interp.srf.read_scalar(ops[1].as_sr())?;
            let index = *interp.vrf.read(ops[2].as_vr())?;
            let vlr = interp.vlr.get();
            let vmr = *interp.vmr.read(0)?;
            let mut addresses = Vec::with_capacity(vlr as usize);
            let mut loaded = [0 as Word; LANES];
            for i in 0..(vlr as usize) {
                let addr = base.wrapping_add(index[i]);
                addresses.push(addr);
                loaded[i] = vdmem.read(addr)?;
            }
            let mut z = *interp.vrf.read(dest)?;
            write_vector_masked(&mut z, vlr, &vmr, |i| loaded[i]);
            interp.vrf.write(dest, z)?;
            Ok(ExecOutcome::Continue(ResolvedInstruction::with_addresses(
                decoded.tokens.clone(),
                &addresses,
            )))
        }

        Opcode::SVI => {
            let src = ops[0].as_vr();
            let base = interp.srf.read_scalar(ops[1].as_sr())?;
            let index = *interp.vrf.read(ops[2].as_vr())?;
            let vlr = interp.vlr.get();
            let vmr = *interp.vmr.read(0)?;
            let data = *interp.vrf.read(src)?;
            let mut addresses = Vec::with_capacity(vlr as usize);
            for i in 0..(vlr as usize) {
                let addr = base.wrapping_add(index[i]);
                addresses.push(addr);
                if vmr[i] == 1 {
                    vdmem.write(addr, data[i])?;
                }
            }
            Ok(ExecOutcome::Continue(ResolvedInstruction::with_addresses(
                decoded.tokens.clone(),
                &addresses,
            )))
        }

        Opcode::LS => {
            let dest = ops[0].as_sr();
            let base = interp.srf.read_scalar(ops[1].as_sr())? as i32;
            let imm = ops[2].as_imm();
            let addr = (base.wrapping_add(imm)) as Word;
            let value = sdmem.read(addr)?;
            interp.srf.write_scalar(dest, value)?;
            Ok(ExecOutcome::Continue(plain()))
        }

        Opcode::SS => {
            let src = ops[0].as_sr();
            let base = interp.srf.read_scalar(ops[1].as_sr())? as i32;
            let imm = ops[2].as_imm();
            let addr = (base.wrapping_add(imm)) as Word;
            let value = interp.srf.read_scalar(src)?;
            sdmem.write(addr, value)?;
            Ok(ExecOutcome::Continue(plain()))
        }

        Opcode::ADD => scalar_alu!(|a: Word, b: Word| (a as i32).wrapping_add(b as i32) as Word),
        Opcode::SUB => scalar_alu!(|a: Word, b: Word| (a as i32).wrapping_sub(b as i32) as Word),
        Opcode::SRA => scalar_alu!(arithmetic_right_shift),
        Opcode::SRL => scalar_alu!(logical_right_shift),
        Opcode::SLL => scalar_alu!(logical_left_shift),
        Opcode::AND => scalar_alu!(|a, b| a & b),
        Opcode::OR => scalar_alu!(|a, b| a | b),
        Opcode::XOR => scalar_alu!(|a, b| a ^ b),

        Opcode::BEQ => branch!(|a, b| a == b),
        Opcode::BNE => branch!(|a, b| a != b),
        Opcode::BGT => branch!(|a, b| a > b),
        Opcode::BLT => branch!(|a, b| a < b),
        Opcode::BGE => branch!(|a, b| a >= b),
        Opcode::BLE => branch!(|a, b| a <= b),

        Opcode::HALT => Ok(ExecOutcome::Halt(plain())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::parse_lines;

    fn run_program(source: &str) -> (Interpreter, WordMemory, WordMemory, RunOutcome) {
        let program = parse_lines(source);
        let mut interp = Interpreter::new();
        let mut sdmem = WordMemory::new(crate::constants::SDMEM_WORDS);
        let mut vdmem = WordMemory::new(crate::constants::VDMEM_WORDS_MIN);
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        (interp, sdmem, vdmem, outcome)
    }

    #[test]
    fn elementwise_add_over_full_vector_length() {
        let mut interp = Interpreter::new();
        let mut vr1 = [0 as Word; LANES];
        let mut vr2 = [0 as Word; LANES];
        for i in 0..LANES {
            vr1[i] = (i + 1) as Word;
            vr2[i] = (LANES - i) as Word;
        }
        interp.vrf.write(1, vr1).unwrap();
        interp.vrf.write(2, vr2).unwrap();

        let mut sdmem = WordMemory::new(16);
        let mut vdmem = WordMemory::new(16);
        let program = parse_lines("ADDVV VR3 VR1 VR2\nHALT\n");
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        assert!(outcome.result.is_ok());

        let z = interp.vrf.read(3).unwrap();
        for i in 0..LANES {
            assert_eq!(z[i], 65, "lane {i} should be 65");
        }
    }

    #[test]
    fn partial_vector_length_leaves_the_tail_untouched() {
        let mut interp = Interpreter::new();
        let mut vr1 = [0 as Word; LANES];
        let mut vr2 = [0 as Word; LANES];
        for i in 0..LANES {
            vr1[i] = (i + 1) as Word;
            vr2[i] = (LANES - i) as Word;
        }
        interp.vrf.write(1, vr1).unwrap();
        interp.vrf.write(2, vr2).unwrap();
        interp.srf.write_scalar(0, 10).unwrap();

        let mut sdmem = WordMemory::new(16);
        let mut vdmem = WordMemory::new(16);
        let program = parse_lines("MTCL SR0\nADDVV VR3 VR1 VR2\nHALT\n");
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        assert!(outcome.result.is_ok());

        let z = interp.vrf.read(3).unwrap();
        for i in 0..10 {
            assert_eq!(z[i], 65, "lane {i} should be 65 within the active vector length");
        }
        for i in 10..LANES {
            assert_eq!(z[i], 0, "lane {i} should retain its prior (zero) value past VLR");
        }
    }

    #[test]
    fn mask_gating_retains_unselected_lanes() {
        let mut interp = Interpreter::new();
        let mut vmr = [0 as Word; LANES];
        for i in (0..LANES).step_by(2) {
            vmr[i] = 1;
        }
        interp.vmr.write(0, vmr).unwrap();
        interp.vlr.set(8);
        interp.vrf.write(1, [1; LANES]).unwrap();
        interp.vrf.write(2, [1; LANES]).unwrap();

        let mut sdmem = WordMemory::new(16);
        let mut vdmem = WordMemory::new(16);
        let program = parse_lines("ADDVV VR3 VR1 VR2\nHALT\n");
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        assert!(outcome.result.is_ok());

        let z = interp.vrf.read(3).unwrap();
        for i in 0..8 {
            if i % 2 == 0 {
                assert_eq!(z[i], 2);
            } else {
                assert_eq!(z[i], 0);
            }
        }
        for i in 8..LANES {
            assert_eq!(z[i], 0);
        }
    }

    #[test]
    fn division_by_zero_is_fatal() {
        let mut interp = Interpreter::new();
        interp.vrf.write(1, [10; LANES]).unwrap();
        interp.vrf.write(2, [0; LANES]).unwrap();
        let mut sdmem = WordMemory::new(16);
        let mut vdmem = WordMemory::new(16);
        let program = parse_lines("DIVVV VR3 VR1 VR2\nHALT\n");
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        assert!(matches!(
            outcome.result,
            Err(FailureAt {
                error: FunctionalError::Arithmetic(ArithmeticError::DivisionByZero { .. }),
                ..
            })
        ));
    }

    #[test]
    fn division_by_zero_on_a_masked_off_lane_is_still_fatal() {
        let mut interp = Interpreter::new();
        interp.vrf.write(1, [10; LANES]).unwrap();
        interp.vrf.write(2, [0; LANES]).unwrap();
        let mut vmr = [1; LANES];
        vmr[0] = 0; // lane 0 is masked off, but still in range and still a zero divisor
        interp.vmr.write(0, vmr).unwrap();
        let mut sdmem = WordMemory::new(16);
        let mut vdmem = WordMemory::new(16);
        let program = parse_lines("DIVVV VR3 VR1 VR2\nHALT\n");
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        assert!(matches!(
            outcome.result,
            Err(FailureAt {
                error: FunctionalError::Arithmetic(ArithmeticError::DivisionByZero { .. }),
                ..
            })
        ));
    }

    #[test]
    fn running_off_the_end_without_halt_is_fatal() {
        let program = parse_lines("ADD SR0 SR1 SR2\n");
        let mut interp = Interpreter::new();
        let mut sdmem = WordMemory::new(16);
        let mut vdmem = WordMemory::new(16);
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        assert!(matches!(
            outcome.result,
            Err(FailureAt {
                error: FunctionalError::Control(ControlError::RanOffEnd { .. }),
                ..
            })
        ));
    }

    #[test]
    fn program_larger_than_imem_capacity_is_rejected_up_front() {
        let program = vec!["HALT".to_string(); crate::constants::IMEM_MAX + 1];
        let mut interp = Interpreter::new();
        let mut sdmem = WordMemory::new(16);
        let mut vdmem = WordMemory::new(16);
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        assert!(matches!(
            outcome.result,
            Err(FailureAt {
                error: FunctionalError::Control(ControlError::ImemOverflow { .. }),
                ..
            })
        ));
        assert!(outcome.trace.is_empty());
    }

    #[test]
    fn infinite_branch_loop_is_detected() {
        let program = parse_lines("BEQ SR0 SR0 0\n");
        let mut interp = Interpreter::new();
        let mut sdmem = WordMemory::new(16);
        let mut vdmem = WordMemory::new(16);
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        assert!(matches!(
            outcome.result,
            Err(FailureAt {
                error: FunctionalError::Control(ControlError::InfiniteLoop { .. }),
                ..
            })
        ));
    }

    #[test]
    fn strided_load_computes_stride_addresses() {
        let mut interp = Interpreter::new();
        interp.srf.write_scalar(0, 0).unwrap();
        interp.srf.write_scalar(1, 2).unwrap();
        interp.vlr.set(4);
        let mut sdmem = WordMemory::new(16);
        let mut vdmem = WordMemory::new(16);
        for i in 0..16u32 {
            vdmem.write(i, i).unwrap();
        }
        let program = parse_lines("LVWS VR1 SR0 SR1\nHALT\n");
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        assert!(outcome.result.is_ok());
        assert_eq!(outcome.trace[0].to_string(), "LVWS VR1 SR0 SR1 (0,2,4,6)");
        let z = interp.vrf.read(1).unwrap();
        assert_eq!(&z[..4], &[0, 2, 4, 6]);
    }

    #[test]
    fn dot_product_of_identical_ramps_is_sum_of_squares() {
        let n = 8u32;
        let mut interp = Interpreter::new();
        interp.srf.write_scalar(0, 0).unwrap(); // base address for both loads
        interp.srf.write_scalar(1, n).unwrap();

        let mut sdmem = WordMemory::new(16);
        let mut vdmem = WordMemory::new(16);
        for i in 0..n {
            vdmem.write(i, i).unwrap(); // v[i] = i, w[i] = i
        }

        let program = parse_lines(
            "MTCL SR1\n\
             LV VR1 SR0\n\
             LV VR2 SR0\n\
             MULVV VR3 VR1 VR2\n\
             HALT\n",
        );
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        assert!(outcome.result.is_ok());

        let products = interp.vrf.read(3).unwrap();
        let dot: u32 = products[..n as usize].iter().sum();
        let expected: u32 = (0..n).map(|i| i * i).sum();
        assert_eq!(dot, expected);
    }

    #[test]
    fn mtcl_clamps_and_annotates_trace() {
        let mut interp = Interpreter::new();
        interp.srf.write_scalar(0, 9999).unwrap();
        let mut sdmem = WordMemory::new(16);
        let mut vdmem = WordMemory::new(16);
        let program = parse_lines("MTCL SR0\nHALT\n");
        let outcome = run(&program, &mut interp, &mut sdmem, &mut vdmem);
        assert!(outcome.result.is_ok());
        assert_eq!(interp.vlr.get(), 64);
        assert_eq!(outcome.trace[0].to_string(), "MTCL SR0 64");
    }
}
