//! The operand-role map: for each opcode, which positional operand is a
//! scalar/vector destination and which are scalar/vector sources. This is
//! the table the decode stage consults to populate the scoreboard and the
//! timing-side decoded instruction.

use vvm::decode::DecodedLine;
use vvm::opcode::Opcode;

/// A decoded instruction's source and destination register sets, in the
/// shape the scoreboard checks against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperandRoles {
    pub sdest: Option<usize>,
    pub vdest: Option<usize>,
    pub ssrc: Vec<usize>,
    pub vsrc: Vec<usize>,
}

/// Extracts the operand roles of `decoded` from its opcode and operand list.
///
/// This reproduces the source's `parseInstruction` table, corrected: stores
/// (`SV`, `SVWS`, `SVI`) name their vector operand as a *source* (the data
/// being written out), not a destination — the source material sets it as
/// `VDest`, which would let a store falsely gate later readers of that
/// register via WAW rather than a true RAW read dependency. `LVWS`'s second
/// scalar operand (the stride) is also kept as a second source rather than
/// overwriting the base in a single-element `SSrc`. See `DESIGN.md`.
pub fn roles(decoded: &DecodedLine) -> OperandRoles {
    use Opcode::*;
    let ops = &decoded.operands;
    let vr = |i: usize| ops[i].as_vr();
    let sr = |i: usize| ops[i].as_sr();

    match decoded.opcode {
        ADDVV | SUBVV | MULVV | DIVVV => OperandRoles {
            vdest: Some(vr(0)),
            vsrc: vec![vr(1), vr(2)],
            ..Default::default()
        },
        ADDVS | SUBVS | MULVS | DIVVS => OperandRoles {
            vdest: Some(vr(0)),
            vsrc: vec![vr(1)],
            ssrc: vec![sr(2)],
            ..Default::default()
        },
        SEQVV | SNEVV | SGTVV | SLTVV | SGEVV | SLEVV => OperandRoles {
            vsrc: vec![vr(0), vr(1)],
            ..Default::default()
        },
        SEQVS | SNEVS | SGTVS | SLTVS | SGEVS | SLEVS => OperandRoles {
            vsrc: vec![vr(0)],
            ssrc: vec![sr(1)],
            ..Default::default()
        },
        CVM | HALT => OperandRoles::default(),
        POP | MFCL => OperandRoles {
            sdest: Some(sr(0)),
            ..Default::default()
        },
        MTCL => OperandRoles {
            ssrc: vec![sr(0)],
            ..Default::default()
        },
        LV => OperandRoles {
            vdest: Some(vr(0)),
            ssrc: vec![sr(1)],
            ..Default::default()
        },
        SV => OperandRoles {
            vsrc: vec![vr(0)],
            ssrc: vec![sr(1)],
            ..Default::default()
        },
        LVWS => OperandRoles {
            vdest: Some(vr(0)),
            ssrc: vec![sr(1), sr(2)],
            ..Default::default()
        },
        SVWS => OperandRoles {
            vsrc: vec![vr(0)],
            ssrc: vec![sr(1), sr(2)],
            ..Default::default()
        },
        LVI => OperandRoles {
            vdest: Some(vr(0)),
            ssrc: vec![sr(1)],
            vsrc: vec![vr(2)],
            ..Default::default()
        },
        SVI => OperandRoles {
            ssrc: vec![sr(1)],
            vsrc: vec![vr(0), vr(2)],
            ..Default::default()
        },
        LS => OperandRoles {
            sdest: Some(sr(0)),
            ssrc: vec![sr(1)],
            ..Default::default()
        },
        SS => OperandRoles {
            ssrc: vec![sr(0), sr(1)],
            ..Default::default()
        },
        ADD | SUB | SRA | SRL | SLL | AND | OR | XOR => OperandRoles {
            sdest: Some(sr(0)),
            ssrc: vec![sr(1), sr(2)],
            ..Default::default()
        },
        // Open question (resolved, see DESIGN.md): branches consume scalar
        // scoreboard reads on both operands rather than replicating the
        // source's gap.
        BEQ | BNE | BGT | BLT | BGE | BLE => OperandRoles {
            ssrc: vec![sr(0), sr(1)],
            ..Default::default()
        },
    }
}
