fn main() {
    if let Err(err) = vers3chat::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
