fn main() {
    if let Err(e) = ewc_cli::run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
