//! Version command.

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prints the version string and exits successfully.
pub fn handle_version_command() -> ! {
    println!("streamchat {}", VERSION);
    std::process::exit(0)
}
