use crate::constants::{SRF_COUNT, VRF_COUNT};
use crate::error::DecodeError;
use crate::opcode::Opcode;
use vvm_util::EnumFromStr;

/// The shape an operand token must have, keyed to its position in an
/// instruction's operand list.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperandShape {
    /// `VR` followed by a non-negative integer `< VRF_COUNT`.
    Vr,
    /// `SR` followed by a non-negative integer `< SRF_COUNT`.
    Sr,
    /// An optionally-signed decimal integer.
    Imm,
}

/// A single decoded operand.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operand {
    Vr(usize),
    Sr(usize),
    Imm(i32),
}

impl Operand {
    /// Panics if this operand is not a `Vr` — callers consult
    /// [`operand_shapes`] before indexing, so the shape is already known.
    pub fn as_vr(self) -> usize {
        match self {
            Operand::Vr(idx) => idx,
            _ => panic!("operand is not a vector register"),
        }
    }

    pub fn as_sr(self) -> usize {
        match self {
            Operand::Sr(idx) => idx,
            _ => panic!("operand is not a scalar register"),
        }
    }

    pub fn as_imm(self) -> i32 {
        match self {
            Operand::Imm(v) => v,
            _ => panic!("operand is not an immediate"),
        }
    }
}

/// One decoded line of assembly: the opcode, its raw tokens (kept for the
/// resolved trace) and its typed operands.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DecodedLine {
    pub pc: usize,
    pub opcode: Opcode,
    pub tokens: Vec<String>,
    pub operands: Vec<Operand>,
}

/// The operand signature of every opcode, in the order the operands appear
/// in the assembly mnemonic.
pub fn operand_shapes(opcode: Opcode) -> &'static [OperandShape] {
    use OperandShape::{Imm, Sr, Vr};
    match opcode {
        Opcode::ADDVV | Opcode::SUBVV | Opcode::MULVV | Opcode::DIVVV => &[Vr, Vr, Vr],
        Opcode::SEQVV
        | Opcode::SNEVV
        | Opcode::SGTVV
        | Opcode::SLTVV
        | Opcode::SGEVV
        | Opcode::SLEVV => &[Vr, Vr],
        Opcode::ADDVS | Opcode::SUBVS | Opcode::MULVS | Opcode::DIVVS => &[Vr, Vr, Sr],
        Opcode::SEQVS
        | Opcode::SNEVS
        | Opcode::SGTVS
        | Opcode::SLTVS
        | Opcode::SGEVS
        | Opcode::SLEVS => &[Vr, Sr],
        Opcode::CVM | Opcode::HALT => &[],
        Opcode::POP | Opcode::MTCL | Opcode::MFCL => &[Sr],
        Opcode::LV | Opcode::SV => &[Vr, Sr],
        Opcode::LVWS | Opcode::SVWS => &[Vr, Sr, Sr],
        Opcode::LVI | Opcode::SVI => &[Vr, Sr, Vr],
        Opcode::LS | Opcode::SS => &[Sr, Sr, Imm],
        Opcode::ADD
        | Opcode::SUB
        | Opcode::SRA
        | Opcode::SRL
        | Opcode::SLL
        | Opcode::AND
        | Opcode::OR
        | Opcode::XOR => &[Sr, Sr, Sr],
        Opcode::BEQ | Opcode::BNE | Opcode::BGT | Opcode::BLT | Opcode::BGE | Opcode::BLE => {
            &[Sr, Sr, Imm]
        }
    }
}

/// Strips a single trailing comma from a token, the way a listing separates
/// operands (`VR1,` `SR2,`) but the last operand on the line has none.
fn trim_token(token: &str) -> &str {
    token.strip_suffix(',').unwrap_or(token)
}

fn parse_register(pc: usize, token: &str, prefix: &str, max: u32) -> Result<usize, DecodeError> {
    let digits = token.strip_prefix(prefix).ok_or_else(|| DecodeError::BadOperand {
        pc,
        token: token.to_string(),
        shape: if prefix == "VR" { "vector register" } else { "scalar register" },
    })?;

    let index: u32 = digits.parse().map_err(|_| DecodeError::BadOperand {
        pc,
        token: token.to_string(),
        shape: if prefix == "VR" { "vector register" } else { "scalar register" },
    })?;

    if index >= max {
        return Err(DecodeError::RegisterOutOfRange { pc, index, max });
    }

    Ok(index as usize)
}

fn parse_immediate(pc: usize, token: &str) -> Result<i32, DecodeError> {
    token.parse().map_err(|_| DecodeError::BadOperand {
        pc,
        token: token.to_string(),
        shape: "immediate",
    })
}

/// Tokenizes `line` on whitespace and validates it against `opcode`'s
/// signature, producing a fully typed [`DecodedLine`].
///
/// # Errors
/// Returns [`DecodeError`] on an unknown mnemonic, a wrong operand count, a
/// malformed operand, or a register index out of range.
pub fn decode_line(pc: usize, line: &str) -> Result<DecodedLine, DecodeError> {
    let tokens: Vec<&str> = line.split_whitespace().map(trim_token).collect();

    let mnemonic = tokens.first().ok_or_else(|| DecodeError::UnknownOpcode {
        pc,
        opcode: String::new(),
    })?;

    let opcode = Opcode::from_str(mnemonic).map_err(|_| DecodeError::UnknownOpcode {
        pc,
        opcode: mnemonic.to_string(),
    })?;

    let shapes = operand_shapes(opcode);
    let given = &tokens[1..];

    if given.len() != shapes.len() {
        return Err(DecodeError::OperandCount {
            pc,
            opcode: mnemonic.to_string(),
            expected: shapes.len(),
            found: given.len(),
        });
    }

    let mut operands = Vec::with_capacity(shapes.len());
    for (&shape, &token) in shapes.iter().zip(given.iter()) {
        let operand = match shape {
            OperandShape::Vr => Operand::Vr(parse_register(pc, token, "VR", VRF_COUNT as u32)?),
            OperandShape::Sr => Operand::Sr(parse_register(pc, token, "SR", SRF_COUNT as u32)?),
            OperandShape::Imm => Operand::Imm(parse_immediate(pc, token)?),
        };
        operands.push(operand);
    }

    Ok(DecodedLine {
        pc,
        opcode,
        tokens: tokens.iter().map(|s| s.to_string()).collect(),
        operands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_vector_vector_add() {
        let decoded = decode_line(0, "ADDVV VR3, VR1, VR2").unwrap();
        assert_eq!(decoded.opcode, Opcode::ADDVV);
        assert_eq!(
            decoded.operands,
            vec![Operand::Vr(3), Operand::Vr(1), Operand::Vr(2)]
        );
    }

    #[test]
    fn decodes_branch_with_negative_immediate() {
        let decoded = decode_line(0, "BEQ SR0 SR1 -3").unwrap();
        assert_eq!(decoded.operands[2], Operand::Imm(-3));
    }

    #[test]
    fn rejects_unknown_opcode() {
        assert!(decode_line(0, "FROBNICATE VR0").is_err());
    }

    #[test]
    fn rejects_wrong_operand_count() {
        assert!(matches!(
            decode_line(0, "ADDVV VR1, VR2"),
            Err(DecodeError::OperandCount { .. })
        ));
    }

    #[test]
    fn rejects_register_out_of_range() {
        assert!(matches!(
            decode_line(0, "MTCL SR9"),
            Err(DecodeError::RegisterOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_wrong_register_shape() {
        assert!(matches!(
            decode_line(0, "MTCL VR0"),
            Err(DecodeError::BadOperand { .. })
        ));
    }
}
