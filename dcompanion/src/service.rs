//! Single-turn companion replies with per-session history.

use std::sync::Arc;

use dcommon::{GenerationOptions, SessionId};
use dprovider::{Content, GenerateRequest, GenerativeModel};

use crate::{
    COMPANION_SYSTEM_PROMPT, CompanionError, ConversationStore, FALLBACK_REPLY, companion_options,
    seed_history,
};

#[derive(Clone)]
pub struct CompanionService {
    model: Arc<dyn GenerativeModel>,
    store: Arc<dyn ConversationStore>,
    model_name: String,
    system_prompt: String,
    options: GenerationOptions,
}

impl CompanionService {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        store: Arc<dyn ConversationStore>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            model,
            store,
            model_name: model_name.into(),
            system_prompt: COMPANION_SYSTEM_PROMPT.to_string(),
            options: companion_options(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Answers one user message within `session`, recording the turn.
    ///
    /// Model failures do not surface as errors: the caller receives
    /// [`FALLBACK_REPLY`] and the turn is not recorded. Only invalid input and
    /// store failures return `Err`.
    pub async fn reply(&self, session: &SessionId, input: &str) -> Result<String, CompanionError> {
        self.turn(Some(session), input).await
    }

    /// Answers a message with only the seed exchange as context. Nothing is
    /// read from or written to the store.
    pub async fn reply_once(&self, input: &str) -> Result<String, CompanionError> {
        self.turn(None, input).await
    }

    async fn turn(&self, session: Option<&SessionId>, input: &str) -> Result<String, CompanionError> {
        if input.trim().is_empty() {
            return Err(CompanionError::invalid_request("message must not be empty"));
        }

        let prior = match session {
            Some(session) => self.store.load_turns(session).await?,
            None => Vec::new(),
        };
        let user_turn = Content::user(input);

        let mut contents = seed_history();
        contents.extend(prior);
        contents.push(user_turn.clone());

        let request = GenerateRequest::new(self.model_name.clone(), contents)
            .with_system_instruction(self.system_prompt.clone())
            .with_options(self.options);

        let session_label = session.map(SessionId::as_str).unwrap_or("-");
        let reply = match self.model.generate(request).await {
            Ok(response) => response.text(),
            Err(err) => {
                tracing::error!(
                    phase = "companion",
                    event = "generate_failed",
                    session = session_label,
                    error = %err,
                    retryable = err.is_retryable(),
                    "Companion reply failed"
                );
                return Ok(FALLBACK_REPLY.to_string());
            }
        };

        if reply.trim().is_empty() {
            tracing::warn!(
                phase = "companion",
                event = "empty_reply",
                session = session_label,
                "Model returned no text"
            );
            return Ok(FALLBACK_REPLY.to_string());
        }

        if let Some(session) = session {
            self.store
                .append_turns(session, vec![user_turn, Content::model(reply.clone())])
                .await?;
        }

        tracing::debug!(
            phase = "companion",
            event = "reply_complete",
            session = session_label,
            chars = reply.len(),
            "Companion replied"
        );

        Ok(reply)
    }
}
