use std::process::ExitCode;

use easycert::{report, run};

fn main() -> ExitCode {
    ExitCode::from(report(&run(std::env::args_os())))
}
