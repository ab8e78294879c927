//! Binary entrypoint for sysfont-cli

fn main() {
    if let Err(err) = sysfont_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
