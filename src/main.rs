fn main() {
    if let Err(err) = chronos_viz::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
