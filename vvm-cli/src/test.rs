//! Black-box tests driving `run_vfunc`/`run_vtime` against small IO-directory
//! fixtures: constructing a program, running it, and asserting on the files
//! it leaves behind, rather than unit-testing internals.

use super::*;
use std::fs;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn functional_run_produces_every_output_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "Code.asm", "HALT\n");
    write(dir.path(), "SDMEM.txt", "0\n");
    write(dir.path(), "VDMEM.txt", "0\n");

    run_vfunc(dir.path()).unwrap();

    for name in [
        "SRF.txt",
        "VRF.txt",
        "VMR.txt",
        "VLR.txt",
        "SDMEMOP.txt",
        "VDMEMOP.txt",
        "resolvedData.txt",
    ] {
        assert!(dir.path().join(name).exists(), "missing {name}");
    }

    let vlr = fs::read_to_string(dir.path().join("VLR.txt")).unwrap();
    assert!(vlr.contains("64"), "VLR should still read MVL: {vlr}");

    let resolved = fs::read_to_string(dir.path().join("resolvedData.txt")).unwrap();
    assert_eq!(resolved.trim(), "HALT");
}

#[test]
fn fatal_error_still_dumps_state_and_reports_the_offending_pc() {
    let dir = tempdir().unwrap();
    write(dir.path(), "Code.asm", "DIVVV VR1 VR2 VR3\nHALT\n");
    write(dir.path(), "SDMEM.txt", "0\n");
    write(dir.path(), "VDMEM.txt", "0\n");

    let result = run_vfunc(dir.path());
    match result {
        Err(IoError::Fatal { pc, .. }) => assert_eq!(pc, 0),
        other => panic!("expected a fatal division-by-zero error, got {other:?}"),
    }

    assert!(dir.path().join("SRF.txt").exists());
    assert!(dir.path().join("resolvedData.txt").exists());
}

#[test]
fn timing_run_writes_one_output_file_per_config_and_a_summary() {
    let dir = tempdir().unwrap();
    write(dir.path(), "Data.txt", "ADD SR0 SR1 SR2\nHALT\n");
    write(
        dir.path(),
        "Config1.txt",
        "dataQueueDepth = 4\n\
         computeQueueDepth = 4\n\
         vdmNumBanks = 8\n\
         vlsPipelineDepth = 2\n\
         numLanes = 1\n\
         pipelineDepthAdd = 2\n\
         pipelineDepthMul = 4\n\
         pipelineDepthDiv = 8\n",
    );

    run_vtime(dir.path(), &[]).unwrap();

    let output = fs::read_to_string(dir.path().join("Output1.txt")).unwrap();
    assert!(output.contains("Clock Cycles:"));
    assert!(output.contains("Time Elapsed:"));

    let summary = fs::read_to_string(dir.path().join("Summary.txt")).unwrap();
    assert!(summary.contains("Config1"));
}
