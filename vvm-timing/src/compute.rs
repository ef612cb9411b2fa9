//! The compute engine: three independent pipelines (add/sub-class, mul,
//! div), each holding at most one in-flight instruction, clocked as
//! `depth + ceil(V / lanes) - 1`.

use crate::classify::{Class, Pipeline};
use crate::instr::TimingInstr;

struct PipelineState {
    depth: u32,
    remaining: u32,
    in_flight: Option<TimingInstr>,
}

impl PipelineState {
    fn new(depth: u32) -> Self {
        PipelineState {
            depth,
            remaining: 0,
            in_flight: None,
        }
    }

    fn is_free(&self) -> bool {
        self.in_flight.is_none()
    }

    fn dispatch(&mut self, instr: TimingInstr, vector_length: u32, lanes: u32) {
        let latency = ceil_div(vector_length, lanes);
        self.remaining = self.depth + latency - 1;
        self.in_flight = Some(instr);
    }

    /// Decrements the pipeline's remaining-cycle counter (a no-op the cycle
    /// an instruction is freshly dispatched, since that counter is set
    /// *after* this runs), and releases the in-flight instruction the cycle
    /// it reaches zero.
    fn decrement(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    fn take_if_done(&mut self) -> Option<TimingInstr> {
        if self.in_flight.is_some() && self.remaining == 0 {
            self.in_flight.take()
        } else {
            None
        }
    }
}

fn ceil_div(v: u32, lanes: u32) -> u32 {
    (v + lanes - 1) / lanes
}

pub struct ComputeEngine {
    add: PipelineState,
    mul: PipelineState,
    div: PipelineState,
}

impl ComputeEngine {
    pub fn new(add_depth: u32, mul_depth: u32, div_depth: u32) -> Self {
        ComputeEngine {
            add: PipelineState::new(add_depth),
            mul: PipelineState::new(mul_depth),
            div: PipelineState::new(div_depth),
        }
    }

    pub fn pipeline_free(&self, pipeline: Pipeline) -> bool {
        match pipeline {
            Pipeline::Add => self.add.is_free(),
            Pipeline::Mul => self.mul.is_free(),
            Pipeline::Div => self.div.is_free(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.add.is_free() && self.mul.is_free() && self.div.is_free()
    }

    /// Advances every non-idle pipeline by one cycle, dispatching `dispatch`
    /// (if any) into its pipeline first. Returns the instructions (0-3) that
    /// complete this cycle.
    pub fn tick(&mut self, dispatch: Option<TimingInstr>, vector_length: u32, lanes: u32) -> Vec<TimingInstr> {
        self.add.decrement();
        self.mul.decrement();
        self.div.decrement();

        if let Some(instr) = dispatch {
            let pipeline = match instr.class {
                Class::Compute(p) => p,
                _ => unreachable!("only compute-class instructions dispatch into the compute engine"),
            };
            match pipeline {
                Pipeline::Add => self.add.dispatch(instr, vector_length, lanes),
                Pipeline::Mul => self.mul.dispatch(instr, vector_length, lanes),
                Pipeline::Div => self.div.dispatch(instr, vector_length, lanes),
            }
        }

        [
            self.add.take_if_done(),
            self.mul.take_if_done(),
            self.div.take_if_done(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
