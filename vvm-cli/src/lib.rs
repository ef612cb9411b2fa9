//! Glue between the plain-text harness files and the `vvm`/`vvm-timing`
//! libraries: reads `Code.asm`/`SDMEM.txt`/`VDMEM.txt` or `Data.txt`/
//! `Config*.txt`, drives a functional or timing run, and writes the result
//! files back into the same directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use vvm::constants::{SDMEM_WORDS, VDMEM_WORDS_MIN};
use vvm::error::FunctionalError;
use vvm::interp::{self, Interpreter};
use vvm::memory::WordMemory;
use vvm::program;
use vvm::register_file::{RegisterFile, Vlr};
use vvm::Word;

use vvm_timing::error::{ConfigError, TraceError};
use vvm_timing::Config;

#[derive(Debug, Error)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error("fatal error at PC {pc}: {source}")]
    Fatal {
        pc: usize,
        #[source]
        source: FunctionalError,
    },
}

fn read_to_string(path: &Path) -> Result<String, IoError> {
    Ok(fs::read_to_string(path)?)
}

fn bad_word(file: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("{file} contains a non-integer word"))
}

/// Writes a register file as a space-padded table: a header row of column
/// indices, a dashed separator, then one row per register.
fn dump_table<const N: usize, const W: usize>(
    path: &Path,
    rf: &RegisterFile<N, W>,
) -> io::Result<()> {
    let mut out = String::new();
    for i in 0..W {
        out.push_str(&format!("{:<13}", i));
    }
    out.push('\n');
    out.push_str(&"-".repeat(W * 13));
    out.push('\n');
    for idx in 0..N {
        let lane = rf.read(idx).expect("idx < N by construction");
        for value in lane {
            out.push_str(&format!("{:<13}", *value as i32));
        }
        out.push('\n');
    }
    fs::write(path, out)
}

/// `VLR.txt` follows the same one-column table convention as the other
/// register-file dumps.
fn dump_vlr(path: &Path, vlr: &Vlr) -> io::Result<()> {
    let out = format!("{:<13}\n{}\n{:<13}\n", 0, "-".repeat(13), vlr.get());
    fs::write(path, out)
}

/// `SDMEMOP.txt`/`VDMEMOP.txt`: one signed decimal word per line.
fn dump_words(path: &Path, words: &[Word]) -> io::Result<()> {
    let mut out = String::new();
    for word in words {
        out.push_str(&(*word as i32).to_string());
        out.push('\n');
    }
    fs::write(path, out)
}

/// Runs a functional simulation over `iodir`, always dumping architectural
/// state on the way out (even on a fatal error, matching the interpreter's
/// contract of leaving state as of the last instruction that executed).
pub fn run_vfunc(iodir: &Path) -> Result<(), IoError> {
    let code = read_to_string(&iodir.join("Code.asm"))?;
    let program = program::parse_lines(&code);

    let sdmem_src = read_to_string(&iodir.join("SDMEM.txt"))?;
    let sdmem_words = program::parse_words(&sdmem_src).map_err(|_| bad_word("SDMEM.txt"))?;
    let vdmem_src = read_to_string(&iodir.join("VDMEM.txt"))?;
    let vdmem_words = program::parse_words(&vdmem_src).map_err(|_| bad_word("VDMEM.txt"))?;

    let mut sdmem = WordMemory::new(SDMEM_WORDS);
    sdmem.load_prefix(&sdmem_words);
    let mut vdmem = WordMemory::new(VDMEM_WORDS_MIN.max(vdmem_words.len() as u32));
    vdmem.load_prefix(&vdmem_words);

    let mut interp = Interpreter::new();
    let outcome = interp::run(&program, &mut interp, &mut sdmem, &mut vdmem);

    dump_table(&iodir.join("SRF.txt"), &interp.srf)?;
    dump_table(&iodir.join("VRF.txt"), &interp.vrf)?;
    dump_table(&iodir.join("VMR.txt"), &interp.vmr)?;
    dump_vlr(&iodir.join("VLR.txt"), &interp.vlr)?;
    dump_words(&iodir.join("SDMEMOP.txt"), sdmem.data())?;
    dump_words(&iodir.join("VDMEMOP.txt"), vdmem.data())?;

    let resolved: String = outcome.trace.iter().map(|r| format!("{r}\n")).collect();
    fs::write(iodir.join("resolvedData.txt"), resolved)?;

    match outcome.result {
        Ok(()) => Ok(()),
        Err(failure) => Err(IoError::Fatal {
            pc: failure.pc,
            source: failure.error,
        }),
    }
}

/// Every `ConfigN.txt` in `iodir`, sorted by name, unless `explicit` names
/// specific files.
fn discover_configs(iodir: &Path, explicit: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    if !explicit.is_empty() {
        return Ok(explicit.to_vec());
    }
    let mut found: Vec<PathBuf> = fs::read_dir(iodir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.starts_with("Config") && name.ends_with(".txt"))
        })
        .collect();
    found.sort();
    Ok(found)
}

/// Runs the timing core once per discovered config file, writing
/// `OutputN.txt` for each and a combined `Summary.txt`.
pub fn run_vtime(iodir: &Path, explicit_configs: &[PathBuf]) -> Result<(), IoError> {
    let data_src = read_to_string(&iodir.join("Data.txt"))?;
    let trace = program::parse_lines(&data_src)
        .iter()
        .enumerate()
        .map(|(i, line)| vvm_timing::parse_resolved_line(i, line))
        .collect::<Result<Vec<_>, _>>()?;

    let config_paths = discover_configs(iodir, explicit_configs)?;
    let mut summary = vec!["================SUMMARY================".to_string()];

    for (index, path) in config_paths.iter().enumerate() {
        let source = read_to_string(path)?;
        let config: Config = vvm_timing::config::parse(&source)?;

        let start = std::time::Instant::now();
        let cycles = vvm_timing::run(&trace, &config);
        let elapsed = start.elapsed();

        let label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Config")
            .to_string();

        let minutes = elapsed.as_secs() / 60;
        let seconds = elapsed.as_secs() % 60;
        let output = format!(
            "================RESULT================\nClock Cycles: {cycles}\nTime Elapsed: {minutes}m {seconds}s\n======================================\n"
        );
        fs::write(iodir.join(format!("Output{}.txt", index + 1)), output)?;
        summary.push(format!("{label} {cycles}"));
    }

    summary.push("======================================".to_string());
    fs::write(iodir.join("Summary.txt"), summary.join("\n") + "\n")?;

    Ok(())
}

#[cfg(test)]
mod test;
