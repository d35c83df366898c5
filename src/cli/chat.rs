//! The `streamchat` chat command: one-shot send or a line-based loop.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use color_eyre::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::output::DeltaPrinter;
use crate::attachments::Attachment;
use crate::conversation::Conversation;
use crate::error::{ChatError, ChatResult};
use crate::stream::Completion;
use crate::traits::HttpClient;
use crate::transcript::TranscriptEvent;

/// Exit status used when the process is interrupted while idle.
const INTERRUPTED: i32 = 130;

/// Token for the send in flight, shared with the Ctrl+C handler.
///
/// Ctrl+C during a send cancels it; Ctrl+C while idle exits.
#[derive(Debug, Clone, Default)]
pub struct CancelSlot {
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl CancelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the Ctrl+C handler for this slot.
    pub fn install_handler(&self) -> Result<()> {
        let slot = self.clone();
        ctrlc::set_handler(move || {
            if !slot.cancel() {
                std::process::exit(INTERRUPTED);
            }
        })?;
        Ok(())
    }

    /// Start a new send and return its token.
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            *current = Some(token.clone());
        }
        token
    }

    pub fn finish(&self) {
        if let Ok(mut current) = self.current.lock() {
            current.take();
        }
    }

    /// Cancel the send in flight. Returns false when nothing was running.
    pub fn cancel(&self) -> bool {
        match self.current.lock().ok().and_then(|mut c| c.take()) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

/// Drives a [`Conversation`] from the terminal.
pub struct ChatSession<C: HttpClient> {
    conversation: Conversation<C>,
    events: mpsc::UnboundedReceiver<TranscriptEvent>,
    printer: DeltaPrinter<io::Stdout>,
    cancel: CancelSlot,
}

impl<C: HttpClient> ChatSession<C> {
    pub fn new(mut conversation: Conversation<C>, cancel: CancelSlot) -> Self {
        let events = conversation.subscribe();
        Self {
            conversation,
            events,
            printer: DeltaPrinter::new(io::stdout()),
            cancel,
        }
    }

    /// Send one prompt, printing the reply as it streams.
    pub async fn send(&mut self, prompt: &str, attachments: &[Attachment]) -> ChatResult<Completion> {
        let token = self.cancel.begin();
        let send = self.conversation.send(prompt, attachments, &token);
        tokio::pin!(send);

        let result = loop {
            tokio::select! {
                result = &mut send => break result,
                Some(event) = self.events.recv() => print_event(&mut self.printer, &event),
            }
        };
        while let Ok(event) = self.events.try_recv() {
            print_event(&mut self.printer, &event);
        }
        self.cancel.finish();

        if let Err(err) = &result {
            report(err);
        }
        result
    }

    /// Read prompts from stdin until EOF or `/quit`.
    pub async fn repl(&mut self, attachments: &[Attachment]) -> Result<()> {
        let (tx, mut lines) = mpsc::unbounded_channel();
        // Stdin is blocking; read it on its own thread
        std::thread::spawn(move || {
            for line in io::stdin().lock().lines().map_while(|l| l.ok()) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        // Attachments go with the first prompt only
        let mut pending = attachments;
        loop {
            print!("> ");
            io::stdout().flush()?;

            let Some(line) = lines.recv().await else {
                println!();
                return Ok(());
            };
            match line.trim() {
                "" => continue,
                "/quit" => return Ok(()),
                "/reset" => {
                    self.conversation.reset();
                    println!("(conversation cleared)");
                    continue;
                }
                prompt => {
                    if self.send(prompt, pending).await.is_ok() {
                        pending = &[];
                    }
                }
            }
        }
    }
}

fn print_event(printer: &mut DeltaPrinter<io::Stdout>, event: &TranscriptEvent) {
    if let Err(err) = printer.handle(event) {
        debug!("Failed to write delta: {}", err);
    }
}

fn report(err: &ChatError) {
    match err {
        ChatError::Cancelled => eprintln!("\n[cancelled]"),
        other => {
            eprintln!("error: {}", other.user_message());
            if other.is_retryable() {
                eprintln!("hint: {}", other.category().recovery_hint());
            }
        }
    }
}

/// Load attachments, then run one send or the interactive loop.
///
/// A failed one-shot send has already been reported on stderr and only
/// changes the exit status.
pub async fn run_chat<C: HttpClient>(
    conversation: Conversation<C>,
    cancel: CancelSlot,
    attachment_paths: &[PathBuf],
    prompt: Option<String>,
) -> Result<ExitCode> {
    let mut attachments = Vec::with_capacity(attachment_paths.len());
    for path in attachment_paths {
        attachments.push(Attachment::load(path).await?);
    }

    let mut session = ChatSession::new(conversation, cancel);
    match prompt {
        Some(prompt) => match session.send(&prompt, &attachments).await {
            Ok(_) => Ok(ExitCode::SUCCESS),
            Err(_) => Ok(ExitCode::FAILURE),
        },
        None => {
            session.repl(&attachments).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
