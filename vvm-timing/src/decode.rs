//! The decode stage: classifies and extracts roles for the freshly fetched
//! instruction, holds the unbounded priority queue of not-yet-dispatchable
//! instructions, the three per-class dispatch queues, and the scoreboard.

use std::collections::VecDeque;

use crate::classify::{Class, Pipeline};
use crate::instr::TimingInstr;
use crate::scoreboard::Scoreboard;

/// What decode handed off to each downstream consumer this cycle.
#[derive(Default)]
pub struct DispatchOutcome {
    pub to_compute: Option<TimingInstr>,
    pub to_data: Option<TimingInstr>,
    /// Scalar instructions retire in the same cycle they're popped; this is
    /// only surfaced for tracing/tests, the scoreboard release already
    /// happened by the time `tick` returns.
    pub scalar_retired: Option<TimingInstr>,
}

/// Whether a class queue currently has room to accept a new dispatch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum QueueStatus {
    Free,
    Busy,
}

pub struct DecodeStage {
    compute_queue_depth: u32,
    data_queue_depth: u32,
    compute_queue: VecDeque<TimingInstr>,
    data_queue: VecDeque<TimingInstr>,
    scalar_queue: VecDeque<TimingInstr>,
    priority_queue: Vec<TimingInstr>,
    compute_status: QueueStatus,
    data_status: QueueStatus,
    scoreboard: Scoreboard,
}

impl DecodeStage {
    pub fn new(compute_queue_depth: u32, data_queue_depth: u32) -> Self {
        DecodeStage {
            compute_queue_depth,
            data_queue_depth,
            compute_queue: VecDeque::new(),
            data_queue: VecDeque::new(),
            scalar_queue: VecDeque::new(),
            priority_queue: Vec::new(),
            compute_status: QueueStatus::Free,
            data_status: QueueStatus::Free,
            scoreboard: Scoreboard::new(),
        }
    }

    /// Drain condition's decode-side clauses: all three class queues empty.
    /// The engines' idleness is the caller's responsibility to check
    /// alongside this and the scoreboard.
    pub fn is_clear(&self, compute_engine_idle: bool, data_engine_idle: bool) -> bool {
        self.compute_queue.is_empty()
            && self.data_queue.is_empty()
            && self.scalar_queue.is_empty()
            && compute_engine_idle
            && data_engine_idle
    }

    pub fn scoreboard_clear(&self) -> bool {
        self.scoreboard.is_clear()
    }

    /// Releases `instr`'s destination bit(s) on the scoreboard. Called by the
    /// driver when the compute or data engine reports a completion.
    pub fn complete(&mut self, instr: &TimingInstr) {
        self.scoreboard.release(&instr.roles);
    }

    /// One cycle: pops ready heads from the compute/data/scalar queues (the
    /// scalar pop retires immediately), then promotes at most one instruction
    /// from the priority queue, finally appending `fetched` (if any) to the
    /// back of the priority queue.
    ///
    /// `pipeline_free` reports whether the add/mul/div pipeline a queued
    /// compute instruction would use is currently free; `data_engine_free`
    /// reports the data engine's availability.
    pub fn tick(
        &mut self,
        fetched: Option<TimingInstr>,
        pipeline_free: impl Fn(Pipeline) -> bool,
        data_engine_free: bool,
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        if self.should_pop_compute(&pipeline_free) {
            outcome.to_compute = self.compute_queue.pop_front();
            self.compute_status = QueueStatus::Free;
        }

        if data_engine_free && !self.data_queue.is_empty() {
            outcome.to_data = self.data_queue.pop_front();
            self.data_status = QueueStatus::Free;
        }

        if let Some(retired) = self.scalar_queue.pop_front() {
            self.scoreboard.release(&retired.roles);
            outcome.scalar_retired = Some(retired);
        }

        if let Some(instr) = fetched {
            self.priority_queue.push(instr);
        }

        self.promote_one(&pipeline_free);

        outcome
    }

    fn should_pop_compute(&self, pipeline_free: &impl Fn(Pipeline) -> bool) -> bool {
        match self.compute_queue.front() {
            Some(head) => match head.class {
                Class::Compute(p) => pipeline_free(p),
                _ => false,
            },
            None => false,
        }
    }

    fn promote_one(&mut self, pipeline_free: &impl Fn(Pipeline) -> bool) {
        for i in 0..self.priority_queue.len() {
            let class = self.priority_queue[i].class;
            let dispatchable = self.scoreboard.dispatchable(&self.priority_queue[i].roles);
            if !dispatchable {
                continue;
            }

            let promoted = match class {
                Class::Compute(_) if self.compute_status == QueueStatus::Free => true,
                Class::Data if self.data_status == QueueStatus::Free => true,
                Class::Scalar => true,
                _ => false,
            };
            if !promoted {
                continue;
            }

            let instr = self.priority_queue.remove(i);
            self.scoreboard.occupy(&instr.roles);

            match instr.class {
                Class::Compute(_) => {
                    self.compute_queue.push_back(instr);
                    self.compute_status = if self.compute_queue.len() as u32 >= self.compute_queue_depth {
                        QueueStatus::Busy
                    } else {
                        QueueStatus::Free
                    };
                }
                Class::Data => {
                    self.data_queue.push_back(instr);
                    self.data_status = if self.data_queue.len() as u32 >= self.data_queue_depth {
                        QueueStatus::Busy
                    } else {
                        QueueStatus::Free
                    };
                }
                Class::Scalar => {
                    self.scalar_queue.push_back(instr);
                }
            }

            // The unused closure binding silences the otherwise-unreachable
            // warning when pipeline_free goes unused by every branch above.
            let _ = pipeline_free;
            break;
        }
    }
}
