//! The driver clock loop: wires fetch, decode, the compute engine and the
//! data engine together and counts cycles until the trace is exhausted and
//! every stage has drained.

use crate::compute::ComputeEngine;
use crate::config::Config;
use crate::data::DataEngine;
use crate::decode::DecodeStage;
use crate::fetch::{Fetch, FetchStatus};
use crate::instr::TimingInstr;
use crate::resolved::ParsedTrace;

/// Runs `trace` to completion under `config`, returning the total cycle
/// count.
pub fn run(trace: &[ParsedTrace], config: &Config) -> u64 {
    let mut fetch = Fetch::new(trace);
    let mut decode = DecodeStage::new(config.compute_queue_depth, config.data_queue_depth);
    let mut compute = ComputeEngine::new(
        config.pipeline_depth_add,
        config.pipeline_depth_mul,
        config.pipeline_depth_div,
    );
    let mut data = DataEngine::new(config.vdm_num_banks, config.vls_pipeline_depth);

    let mut clock: u64 = 0;

    loop {
        let drained = fully_drained(&decode, &compute, &data);
        let fetched = fetch.tick(drained);
        let timing_instr = fetched.map(TimingInstr::from_parsed);

        let outcome = decode.tick(timing_instr, |p| compute.pipeline_free(p), data.is_idle());

        for done in compute.tick(outcome.to_compute, fetch.vector_length(), config.num_lanes) {
            decode.complete(&done);
        }
        if let Some(done) = data.tick(outcome.to_data) {
            decode.complete(&done);
        }

        clock += 1;

        if fetch.status() == FetchStatus::Completed && fully_drained(&decode, &compute, &data) {
            break;
        }
    }

    clock
}

fn fully_drained(decode: &DecodeStage, compute: &ComputeEngine, data: &DataEngine) -> bool {
    decode.is_clear(compute.is_idle(), data.is_idle()) && decode.scoreboard_clear()
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

    fn base_config() -> Config {
        Config {
            data_queue_depth: 4,
            compute_queue_depth: 4,
            vdm_num_banks: 8,
            vls_pipeline_depth: 2,
            num_lanes: 1,
            pipeline_depth_add: 2,
            pipeline_depth_mul: 4,
            pipeline_depth_div: 8,
        }
    }

    #[test]
    fn scalar_only_trace_takes_at_least_one_cycle_per_instruction() {
        let t = trace(&["ADD SR0 SR1 SR2", "SUB SR3 SR0 SR1", "HALT"]);
        let cycles = run(&t, &base_config());
        assert!(cycles as usize >= t.len());
    }

    #[test]
    fn vector_arithmetic_takes_longer_with_more_pipeline_depth() {
        let t = trace(&["MTCL SR0 64", "ADDVV VR1 VR2 VR3", "HALT"]);

        let mut shallow = base_config();
        shallow.pipeline_depth_add = 1;
        let mut deep = base_config();
        deep.pipeline_depth_add = 10;

        let shallow_cycles = run(&t, &shallow);
        let deep_cycles = run(&t, &deep);
        assert!(deep_cycles > shallow_cycles);
    }

    #[test]
    fn dependent_vector_ops_stall_until_their_producer_completes() {
        let t = trace(&[
            "MTCL SR0 64",
            "ADDVV VR1 VR2 VR3",
            "MULVV VR4 VR1 VR5",
            "HALT",
        ]);
        let independent = trace(&[
            "MTCL SR0 64",
            "ADDVV VR1 VR2 VR3",
            "MULVV VR4 VR6 VR5",
            "HALT",
        ]);

        let config = base_config();
        let dependent_cycles = run(&t, &config);
        let independent_cycles = run(&independent, &config);
        assert!(dependent_cycles >= independent_cycles);
    }
}
