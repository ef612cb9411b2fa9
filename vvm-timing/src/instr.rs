//! The timing-side decoded instruction: the record that flows through the
//! priority queue, the per-class queues, the compute engine and the data
//! engine.

use crate::classify::{classify, Class};
use crate::resolved::ParsedTrace;
use crate::roles::{roles, OperandRoles};
use vvm::opcode::Opcode;
use vvm::Word;

#[derive(Clone, Debug)]
pub struct TimingInstr {
    pub opcode: Opcode,
    pub class: Class,
    pub roles: OperandRoles,
    pub addresses: Option<Vec<Word>>,
}

impl TimingInstr {
    pub fn from_parsed(parsed: &ParsedTrace) -> Self {
        TimingInstr {
            opcode: parsed.decoded.opcode,
            class: classify(parsed.decoded.opcode),
            roles: roles(&parsed.decoded),
            addresses: parsed.addresses.clone(),
        }
    }
}
