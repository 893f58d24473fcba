// Main entry point that forwards to the neighbor-index binary
fn main() {
    // Exit with the same code as the app
    std::process::exit(match nbr_app::main() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    });
}
