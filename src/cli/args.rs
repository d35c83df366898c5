//! Command-line argument parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Usage line printed by `--help` and on argument errors.
pub const USAGE: &str = "usage: streamchat [--attach PATH]... [PROMPT]

Streams a chat completion to stdout. Without PROMPT, reads prompts from
stdin one per line (/reset clears the conversation, /quit exits).

options:
  -a, --attach PATH   inline a text file into the prompt (repeatable)
  -V, --version       print version and exit
  -h, --help          print this help and exit

environment:
  STREAMCHAT_ENDPOINT, STREAMCHAT_API_KEY, STREAMCHAT_MODEL, STREAMCHAT_LOG";

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Send one prompt, or run the interactive loop when `prompt` is None
    Chat {
        attachments: Vec<PathBuf>,
        prompt: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(String),
    #[error("unknown option: {0}")]
    UnknownOption(String),
}

/// Parse command-line arguments, skipping the program name.
///
/// Positional arguments are joined with spaces into a single prompt, so
/// `streamchat tell me a joke` works without quoting. `--` ends option
/// parsing.
///
/// # Examples
///
/// ```
/// use streamchat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["streamchat".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut attachments = Vec::new();
    let mut words: Vec<String> = Vec::new();
    let mut args = args.skip(1);
    let mut options_done = false;

    while let Some(arg) = args.next() {
        if options_done {
            words.push(arg);
            continue;
        }
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--attach" | "-a" => {
                let path = args.next().ok_or(ArgsError::MissingValue(arg))?;
                attachments.push(PathBuf::from(path));
            }
            "--" => options_done = true,
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(ArgsError::UnknownOption(other.to_string()));
            }
            _ => words.push(arg),
        }
    }

    let prompt = (!words.is_empty()).then(|| words.join(" "));
    Ok(CliCommand::Chat {
        attachments,
        prompt,
    })
}
