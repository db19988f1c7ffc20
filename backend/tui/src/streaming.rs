//! Streaming Consumer
//!
//! Sends the conversation to the relay, decodes the server-sent events it
//! streams back, and folds the deltas into the trailing assistant message.
//! The transcript lives in a `watch` channel so the UI always renders the
//! latest complete snapshot.

use futures_util::StreamExt;
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};

use crumb_core::error::Result as CoreResult;
use crumb_core::{
    ChatMessage, CrumbError, RelayClient, RelayRequest, ReplyAccumulator, StreamEvent, Transcript,
    APOLOGY, DEFAULT_SYSTEM_PROMPT,
};

/// What the UI renders: the transcript and whether a reply is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatView {
    pub transcript: Transcript,
    pub busy: bool,
}

/// Result of one `send_message` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was blank after trimming; nothing was sent.
    EmptyInput,
    /// Another reply is still streaming; nothing was sent.
    Busy,
    /// The stream ended normally.
    Completed { reply: String },
    /// The request or the stream failed; the reply was replaced by the apology.
    Failed,
}

/// A send that passed the busy guard and is waiting to be streamed.
#[derive(Debug)]
pub struct PendingSend {
    request: RelayRequest,
}

impl PendingSend {
    pub fn request(&self) -> &RelayRequest {
        &self.request
    }
}

/// Owns the transcript and drives one request/response cycle at a time.
pub struct StreamConsumer<C> {
    client: C,
    system_prompt: Option<String>,
    view: watch::Sender<ChatView>,
}

impl<C: RelayClient> StreamConsumer<C> {
    pub fn new(client: C) -> Self {
        let (view, _) = watch::channel(ChatView::default());
        Self {
            client,
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            view,
        }
    }

    /// Replace the system prompt prepended to every request (`None` sends none).
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    /// Receive every transcript update.
    pub fn subscribe(&self) -> watch::Receiver<ChatView> {
        self.view.subscribe()
    }

    pub fn snapshot(&self) -> ChatView {
        self.view.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.view.borrow().busy
    }

    /// Send `text` as the next user message and stream the reply into the
    /// transcript.
    ///
    /// Equivalent to [`begin_send`](Self::begin_send) followed by
    /// [`finish_send`](Self::finish_send).
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        match self.begin_send(text) {
            Ok(pending) => self.finish_send(pending).await,
            Err(rejected) => rejected,
        }
    }

    /// Claim the consumer for `text` without touching the network.
    ///
    /// The user message and an empty assistant placeholder are appended, and
    /// the busy flag set, in a single update. Blank input and sends while
    /// busy are rejected without touching the transcript. The returned
    /// `PendingSend` must be passed to `finish_send`; until then the
    /// consumer stays busy.
    pub fn begin_send(&self, text: &str) -> Result<PendingSend, SendOutcome> {
        if text.trim().is_empty() {
            debug!("ignoring blank input");
            return Err(SendOutcome::EmptyInput);
        }

        let mut history = Vec::new();
        let started = self.view.send_if_modified(|view| {
            if view.busy {
                return false;
            }
            let transcript = std::mem::take(&mut view.transcript)
                .push(ChatMessage::user(text))
                .push(ChatMessage::assistant(""));
            history = transcript.history().to_vec();
            view.transcript = transcript;
            view.busy = true;
            true
        });
        if !started {
            debug!("send rejected: a reply is still streaming");
            return Err(SendOutcome::Busy);
        }

        Ok(PendingSend {
            request: self.build_request(history),
        })
    }

    /// Stream the reply for a send claimed by `begin_send`, then clear busy.
    pub async fn finish_send(&self, pending: PendingSend) -> SendOutcome {
        let request = pending.request;
        let span = info_span!("send", messages = request.messages.len());

        match self.stream_reply(&request).instrument(span).await {
            Ok(reply) => {
                info!(chars = reply.chars().count(), "reply complete");
                self.view.send_modify(|view| view.busy = false);
                SendOutcome::Completed { reply }
            }
            Err(e) => {
                warn!(error = %e, "reply failed");
                self.view.send_modify(|view| {
                    view.transcript = std::mem::take(&mut view.transcript).with_last_content(APOLOGY);
                    view.busy = false;
                });
                SendOutcome::Failed
            }
        }
    }

    fn build_request(&self, history: Vec<ChatMessage>) -> RelayRequest {
        let messages = self
            .system_prompt
            .iter()
            .map(|prompt| ChatMessage::system(prompt.clone()))
            .chain(history)
            .collect();
        RelayRequest::new(messages)
    }

    /// Pull the body chunk by chunk, in arrival order, until it is exhausted.
    async fn stream_reply(&self, request: &RelayRequest) -> CoreResult<String> {
        let mut body = self.client.open_stream(request).await?;
        let mut acc = ReplyAccumulator::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| CrumbError::Stream(e.to_string()))?;
            for event in acc.decode(&chunk) {
                self.apply(&mut acc, &event);
            }
        }
        if let Some(event) = acc.finish() {
            self.apply(&mut acc, &event);
        }

        debug!(deltas = acc.deltas(), malformed = acc.malformed(), "stream exhausted");
        Ok(acc.into_text())
    }

    /// Fold `event` into the reply and, for deltas, publish the full text so
    /// far as the new last message.
    fn apply(&self, acc: &mut ReplyAccumulator, event: &StreamEvent) {
        if acc.apply(event) {
            let text = acc.text().to_owned();
            self.view.send_modify(|view| {
                view.transcript = std::mem::take(&mut view.transcript).with_last_content(text);
            });
        }
    }
}
