use vvm_util::EnumFromStr;
use vvm_util_derive::EnumFromStr;

/// The complete instruction set of the vector core.
///
/// Mnemonics double as the enum's variant names: [`EnumFromStr`] (derived
/// below) turns an assembly mnemonic straight into a variant instead of
/// going through a hand-written `match` on strings.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumFromStr)]
pub enum Opcode {
    //--------------+---------------------------------+--------+-------------------------------------------------
    // Vector-vector arithmetic                       |        |
    ADDVV, // | Z[i] = X[i] + Y[i] for i in [0, VLR)
    SUBVV, // | Z[i] = X[i] - Y[i]
    MULVV, // | Z[i] = X[i] * Y[i]
    DIVVV, // | Z[i] = X[i] / Y[i]; fatal on any zero divisor in range
    //--------------+---------------------------------+--------+-------------------------------------------------
    // Vector-vector mask-writing comparisons         |        | unmasked: always write all MVL lanes of VMR
    SEQVV,
    SNEVV,
    SGTVV,
    SLTVV,
    SGEVV,
    SLEVV,
    //--------------+---------------------------------+--------+-------------------------------------------------
    // Vector-scalar arithmetic (scalar broadcast)    |        |
    ADDVS,
    SUBVS,
    MULVS,
    DIVVS,
    //--------------+---------------------------------+--------+-------------------------------------------------
    // Vector-scalar mask-writing comparisons         |        |
    SEQVS,
    SNEVS,
    SGTVS,
    SLTVS,
    SGEVS,
    SLEVS,
    //--------------+---------------------------------+--------+-------------------------------------------------
    // Mask / vector-length register ops              |        |
    CVM,  // | VMR[0..MVL) = 1
    POP,  // | SR = popcount(VMR)
    MTCL, // | VLR = SR, clamped to [0, MVL]
    MFCL, // | SR = VLR
    //--------------+---------------------------------+--------+-------------------------------------------------
    // Vector loads/stores                            |        |
    LV,   // | VR[i] = VDMEM[SR + i]
    SV,   // | VDMEM[SR + i] = VR[i]
    LVWS, // | VR[i] = VDMEM[SR_base + i * SR_stride]
    SVWS, // | VDMEM[SR_base + i * SR_stride] = VR[i]
    LVI,  // | VR[i] = VDMEM[SR_base + VR_index[i]]
    SVI,  // | VDMEM[SR_base + VR_index[i]] = VR[i]
    //--------------+---------------------------------+--------+-------------------------------------------------
    // Scalar loads/stores                             |        |
    LS, // | SR_dest = SDMEM[SR_base + IMM]
    SS, // | SDMEM[SR_base + IMM] = SR_src
    //--------------+---------------------------------+--------+-------------------------------------------------
    // Scalar ALU                                      |        |
    ADD,
    SUB,
    SRA, // | arithmetic right shift, replicates sign bit
    SRL, // | logical right shift on the unsigned view
    SLL, // | left shift, masked to 32 bits
    AND,
    OR,
    XOR,
    //--------------+---------------------------------+--------+-------------------------------------------------
    // Branches (taken: PC += IMM, not taken: PC += 1) |        |
    BEQ,
    BNE,
    BGT,
    BLT,
    BGE,
    BLE,
    //--------------+---------------------------------+--------+-------------------------------------------------
    // Control                                         |        |
    HALT,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_parses_to_variant() {
        assert_eq!(Opcode::from_str("ADDVV"), Ok(Opcode::ADDVV));
        assert_eq!(Opcode::from_str("HALT"), Ok(Opcode::HALT));
    }

    #[test]
    fn unknown_mnemonic_is_an_error() {
        assert!(Opcode::from_str("NOTANOPCODE").is_err());
    }
}
