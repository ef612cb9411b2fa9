//! The data engine: a banked VDMEM model with a load/store shift-register
//! pipeline. Exactly one vector memory instruction occupies the engine at a
//! time; its address stream drains through banks, each with its own busy
//! timer.

use std::collections::VecDeque;

use crate::instr::TimingInstr;
use vvm::Word;

/// Default per-access bank occupancy, matching the reference timing model
/// (not a `Config.txt` key).
const BANK_BUSY_TIME: u32 = 6;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Status {
    Free,
    Busy,
}

pub struct DataEngine {
    num_banks: u32,
    bank_busy: Vec<u32>,
    /// The shift-register pipeline: `pipeline[0]` is the head (just
    /// admitted), the last element is the tail (next to be charged to a
    /// bank).
    pipeline: Vec<Option<Word>>,
    pending: VecDeque<Word>,
    status: Status,
    current: Option<TimingInstr>,
}

impl DataEngine {
    pub fn new(num_banks: u32, pipeline_depth: u32) -> Self {
        DataEngine {
            num_banks: num_banks.max(1),
            bank_busy: vec![0; num_banks.max(1) as usize],
            pipeline: vec![None; pipeline_depth.max(1) as usize],
            pending: VecDeque::new(),
            status: Status::Free,
            current: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == Status::Free
    }

    /// Advances every bank timer by one cycle, admits `dispatch` if the
    /// engine is free, advances the shift register by one slot, and returns
    /// the instruction that completes this cycle, if any.
    pub fn tick(&mut self, dispatch: Option<TimingInstr>) -> Option<TimingInstr> {
        for timer in &mut self.bank_busy {
            *timer = timer.saturating_sub(1);
        }

        if let Some(instr) = dispatch {
            if self.status == Status::Free {
                self.pending = instr.addresses.clone().unwrap_or_default().into();
                self.current = Some(instr);
                self.status = Status::Busy;
            }
        }

        if self.status == Status::Busy {
            let tail = self.pipeline.len() - 1;
            match self.pipeline[tail] {
                Some(addr) => {
                    let bank = (addr % self.num_banks) as usize;
                    if self.bank_busy[bank] == 0 {
                        self.bank_busy[bank] = BANK_BUSY_TIME;
                        self.pipeline.remove(tail);
                        self.pipeline.insert(0, self.pending.pop_front());
                    }
                    // else: bank conflict, the tail stalls in place.
                }
                None => {
                    self.pipeline.remove(tail);
                    self.pipeline.insert(0, self.pending.pop_front());
                }
            }
        }

        let drained = self.pending.is_empty()
            && self.pipeline.iter().all(Option::is_none)
            && self.bank_busy.iter().all(|&t| t == 0);
        if self.status == Status::Busy && drained {
            self.status = Status::Free;
            self.pipeline.iter_mut().for_each(|slot| *slot = None);
            self.current.take()
        } else {
            None
        }
    }
}
