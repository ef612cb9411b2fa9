#[macro_use]
extern crate clap;

use clap::Arg;
use std::path::PathBuf;
use std::process;

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("IODIR")
                .help("Directory holding Data.txt and one or more Config*.txt files")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .value_name("FILE")
                .help("Explicit config file(s) to run; defaults to every Config*.txt in IODIR"),
        )
        .get_matches();

    let iodir = PathBuf::from(matches.value_of("IODIR").unwrap());
    let configs: Vec<PathBuf> = matches
        .values_of("config")
        .map(|vals| vals.map(PathBuf::from).collect())
        .unwrap_or_default();

    if let Err(err) = vvm_cli::run_vtime(&iodir, &configs) {
        eprintln!("vtime: {}", err);
        process::exit(1);
    }
}
