use vvm::opcode::Opcode;

/// Which functional pipeline a compute-class instruction occupies.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pipeline {
    Add,
    Mul,
    Div,
}

/// The three dispatch classes an instruction can belong to, per the
/// decode stage's issue rule.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Class {
    Compute(Pipeline),
    Data,
    Scalar,
}

/// Maps an opcode to its dispatch class. Vector-vector / vector-scalar
/// arithmetic and the mask-producing comparisons are compute; the six
/// vector loads/stores are data; everything else (scalar ALU, branches,
/// `LS`/`SS`, `MTCL`/`MFCL`/`CVM`/`POP`, `HALT`) is scalar.
pub fn classify(opcode: Opcode) -> Class {
    use Opcode::*;
    match opcode {
        ADDVV | SUBVV | ADDVS | SUBVS | SEQVV | SNEVV | SGTVV | SLTVV | SGEVV | SLEVV | SEQVS
        | SNEVS | SGTVS | SLTVS | SGEVS | SLEVS => Class::Compute(Pipeline::Add),
        MULVV | MULVS => Class::Compute(Pipeline::Mul),
        DIVVV | DIVVS => Class::Compute(Pipeline::Div),

        LV | SV | LVWS | SVWS | LVI | SVI => Class::Data,

        CVM | POP | MTCL | MFCL | LS | SS | ADD | SUB | SRA | SRL | SLL | AND | OR | XOR | BEQ
        | BNE | BGT | BLT | BGE | BLE | HALT => Class::Scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_add_pipeline_compute() {
        assert_eq!(classify(Opcode::ADDVV), Class::Compute(Pipeline::Add));
        assert_eq!(classify(Opcode::SGTVS), Class::Compute(Pipeline::Add));
    }

    #[test]
    fn multiply_and_divide_have_dedicated_pipelines() {
        assert_eq!(classify(Opcode::MULVV), Class::Compute(Pipeline::Mul));
        assert_eq!(classify(Opcode::DIVVS), Class::Compute(Pipeline::Div));
    }

    #[test]
    fn vector_memory_ops_are_data_class() {
        assert_eq!(classify(Opcode::LV), Class::Data);
        assert_eq!(classify(Opcode::SVI), Class::Data);
    }

    #[test]
    fn everything_else_is_scalar() {
        assert_eq!(classify(Opcode::MTCL), Class::Scalar);
        assert_eq!(classify(Opcode::BGT), Class::Scalar);
        assert_eq!(classify(Opcode::HALT), Class::Scalar);
    }
}
