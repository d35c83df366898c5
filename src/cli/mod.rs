//! Command-line front end.
//!
//! `main` parses arguments with [`parse_args`], handles `--version` and
//! `--help` itself, and hands a chat command to [`run_chat`]:
//!
//! ```ignore
//! use streamchat::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args())? {
//!     CliCommand::Version => handle_version_command(),
//!     CliCommand::Help => println!("{}", USAGE),
//!     CliCommand::Chat { attachments, prompt } => { /* run_chat(...) */ }
//! }
//! ```

pub mod args;
pub mod chat;
pub mod output;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, USAGE};
pub use chat::{run_chat, CancelSlot, ChatSession};
pub use output::DeltaPrinter;
pub use version::{handle_version_command, VERSION};
