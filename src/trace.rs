use std::fmt;

/// One resolved entry of the functional→timing contract: the executed
/// instruction's original tokens, plus (for vector memory ops) the literal
/// effective-address list, or (for `MTCL`) the vector length it installed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ResolvedInstruction {
    tokens: Vec<String>,
    suffix: Option<String>,
}

impl ResolvedInstruction {
    /// An instruction with no trailing annotation.
    pub fn plain(tokens: Vec<String>) -> Self {
        ResolvedInstruction {
            tokens,
            suffix: None,
        }
    }

    /// A vector memory instruction, annotated with its effective addresses
    /// in program order: `(addr0,addr1,...)`.
    pub fn with_addresses(tokens: Vec<String>, addresses: &[u32]) -> Self {
        let joined = addresses
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        ResolvedInstruction {
            tokens,
            suffix: Some(format!("({})", joined)),
        }
    }

    /// `MTCL`'s annotation: the vector length it wrote, unparenthesized.
    pub fn with_plain_value(tokens: Vec<String>, value: impl fmt::Display) -> Self {
        ResolvedInstruction {
            tokens,
            suffix: Some(value.to_string()),
        }
    }
}

impl fmt::Display for ResolvedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))?;
        if let Some(suffix) = &self.suffix {
            write!(f, " {}", suffix)?;
        }
        Ok(())
    }
}
