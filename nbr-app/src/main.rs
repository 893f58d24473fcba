//! # Neighbor Index (Binary)
//!
//! Main executable entry point.

use colored::Colorize;

fn main() {
    std::process::exit(match nbr_app::main() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            1
        }
    });
}
