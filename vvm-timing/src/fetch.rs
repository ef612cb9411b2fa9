//! The fetch stage: a sequential cursor into the resolved trace, with the
//! single special case that `MTCL` stalls fetch until decode reports the
//! pipeline has fully drained.

use crate::resolved::ParsedTrace;
use vvm::constants::MVL;
use vvm::opcode::Opcode;

/// Fetch's lifecycle: running through the trace, or past its end.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FetchStatus {
    Running,
    Completed,
}

pub struct Fetch<'a> {
    trace: &'a [ParsedTrace],
    cursor: usize,
    status: FetchStatus,
    vector_length: u32,
}

impl<'a> Fetch<'a> {
    /// Constructs a fetch stage over `trace`, its vector length starting at
    /// MVL (the architectural reset value, matching the functional core).
    pub fn new(trace: &'a [ParsedTrace]) -> Self {
        Fetch {
            trace,
            cursor: 0,
            status: FetchStatus::Running,
            vector_length: MVL,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// The vector length compute latency and data address-list length are
    /// computed against: MVL until the first `MTCL` releases, then whatever
    /// that instruction's trailing operand recorded.
    pub fn vector_length(&self) -> u32 {
        self.vector_length
    }

    /// Advances fetch by one cycle. `decode_clear` is decode's drain state
    /// as of the *end of the previous cycle* — it gates whether a pending
    /// `MTCL` may release this cycle.
    ///
    /// Returns the instruction fetched this cycle, or `None` if fetch is
    /// stalled (on `MTCL`) or has reached the end of the trace.
    pub fn tick(&mut self, decode_clear: bool) -> Option<&'a ParsedTrace> {
        if self.cursor >= self.trace.len() {
            self.status = FetchStatus::Completed;
            return None;
        }

        let entry = &self.trace[self.cursor];

        if entry.decoded.opcode == Opcode::MTCL {
            if !decode_clear {
                return None;
            }
            self.vector_length = entry
                .vl_override
                .expect("resolved MTCL lines always carry their installed vector length");
        }

        self.cursor += 1;
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolved::parse_resolved_line;

    fn trace(lines: &[&str]) -> Vec<ParsedTrace> {
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| parse_resolved_line(i, l).unwrap())
            .collect()
    }

    #[test]
    fn fetches_sequentially_and_completes_at_end() {
        let t = trace(&["ADD SR0 SR1 SR2", "HALT"]);
        let mut fetch = Fetch::new(&t);
        assert!(fetch.tick(true).is_some());
        assert_eq!(fetch.status(), FetchStatus::Running);
        assert!(fetch.tick(true).is_some());
        assert!(fetch.tick(true).is_none());
        assert_eq!(fetch.status(), FetchStatus::Completed);
    }

    #[test]
    fn mtcl_stalls_until_decode_is_clear() {
        let t = trace(&["MTCL SR0 10", "HALT"]);
        let mut fetch = Fetch::new(&t);
        assert!(fetch.tick(false).is_none());
        assert_eq!(fetch.vector_length(), MVL);
        let fetched = fetch.tick(true).unwrap();
        assert_eq!(fetched.decoded.opcode, Opcode::MTCL);
        assert_eq!(fetch.vector_length(), 10);
    }
}
