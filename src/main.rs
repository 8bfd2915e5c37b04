use std::io::{self, BufWriter};
use std::process::ExitCode;

use chess_core::logger::{self, LogConfig};
use chess_core::uci::run_uci_loop;

fn main() -> ExitCode {
    let _log_guard = match logger::init(&LogConfig::from_env()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("info string {e}");
            None
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_uci_loop(stdin.lock(), BufWriter::new(stdout.lock())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("protocol loop failed: {e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
