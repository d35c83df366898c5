//! One chat conversation: the transcript plus the client that extends it.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::attachments::{merge_attachments, Attachment};
use crate::config::ChatConfig;
use crate::error::{ChatError, ChatResult};
use crate::models::ChatRequest;
use crate::stream::{run_stream, Completion, StreamState};
use crate::traits::{ByteStream, HttpClient};
use crate::transcript::{Transcript, TranscriptEvent};

/// Sends prompts and folds the streamed replies into a transcript.
///
/// `send` takes `&mut self`, so at most one stream runs against the
/// transcript at a time.
pub struct Conversation<C: HttpClient> {
    client: C,
    config: ChatConfig,
    transcript: Transcript,
    state: StreamState,
}

impl<C: HttpClient> Conversation<C> {
    pub fn new(client: C, config: ChatConfig) -> Self {
        Self {
            client,
            config,
            transcript: Transcript::new(),
            state: StreamState::Idle,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// State of the most recent send.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Register an observer for transcript changes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TranscriptEvent> {
        self.transcript.subscribe()
    }

    /// Remove every turn and return to `Idle`.
    pub fn reset(&mut self) {
        self.transcript.reset();
        self.state = StreamState::Idle;
    }

    /// Send a prompt and stream the reply into the transcript.
    ///
    /// The user turn is appended before the request goes out. An HTTP error
    /// status fails the send without adding an assistant turn; any other
    /// failure leaves a synthetic error turn at the end of the transcript.
    pub async fn send(
        &mut self,
        prompt: &str,
        attachments: &[Attachment],
        cancel: &CancellationToken,
    ) -> ChatResult<Completion> {
        if prompt.trim().is_empty() && attachments.is_empty() {
            return Err(ChatError::InvalidRequest {
                message: "prompt is empty".to_string(),
            });
        }

        self.transcript
            .push_user(merge_attachments(prompt, attachments));
        let request =
            ChatRequest::from_turns(self.transcript.turns()).with_model(self.config.model.clone());
        let body = serde_json::to_string(&request)?;

        self.state = StreamState::Streaming;
        debug!(
            "Sending {} messages to {}",
            request.messages.len(),
            self.config.endpoint
        );

        let result = match self.issue(&body, cancel).await {
            Ok(stream) => {
                info!("Streaming reply from {}", self.config.endpoint);
                run_stream(&mut self.transcript, stream, cancel).await
            }
            Err(err) => Err(err),
        };

        self.state = match &result {
            Ok(_) => StreamState::Completed,
            Err(_) => StreamState::Failed,
        };
        result
    }

    /// Issue the request and wait for the response headers.
    async fn issue(&mut self, body: &str, cancel: &CancellationToken) -> ChatResult<ByteStream> {
        let headers = self.config.headers();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ChatError::Cancelled),
            response = self.client.post_stream(&self.config.endpoint, body, &headers) => {
                response.map_err(ChatError::from)
            }
        };

        if let Err(err) = &response {
            warn!("Request failed [{}]: {:?}", err.error_code(), err);
            if !matches!(err, ChatError::HttpStatus { .. }) {
                self.transcript.push_error(err.user_message());
            }
        }
        response
    }
}
