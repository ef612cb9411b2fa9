//! The timing core: replays a resolved instruction trace against a banked,
//! multi-pipeline microarchitecture model and reports the cycle count it
//! would take to execute.

pub mod classify;
pub mod compute;
pub mod config;
pub mod data;
pub mod decode;
pub mod driver;
pub mod error;
pub mod fetch;
pub mod instr;
pub mod resolved;
pub mod roles;
pub mod scoreboard;

pub use config::Config;
pub use driver::run;
pub use error::{ConfigError, TraceError};
pub use resolved::{parse_resolved_line, ParsedTrace};
