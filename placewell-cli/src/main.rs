//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    pretty_env_logger::init();
    if let Err(err) = placewell_cli::run() {
        eprintln!("placewell: {err}");
        std::process::exit(1);
    }
}
