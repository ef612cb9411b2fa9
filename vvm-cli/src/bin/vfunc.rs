#[macro_use]
extern crate clap;

use clap::Arg;
use std::path::PathBuf;
use std::process;

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("IODIR")
                .help("Directory holding Code.asm, SDMEM.txt and VDMEM.txt")
                .required(true)
                .index(1),
        )
        .get_matches();

    let iodir = PathBuf::from(matches.value_of("IODIR").unwrap());

    if let Err(err) = vvm_cli::run_vfunc(&iodir) {
        eprintln!("vfunc: {}", err);
        process::exit(1);
    }
}
