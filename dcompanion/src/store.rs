//! Conversation storage contracts and a basic in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use dcommon::{BoxFuture, SessionId};
use dprovider::Content;

use crate::CompanionError;

pub trait ConversationStore: Send + Sync {
    fn load_turns<'a>(
        &'a self,
        session: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<Content>, CompanionError>>;

    fn append_turns<'a>(
        &'a self,
        session: &'a SessionId,
        turns: Vec<Content>,
    ) -> BoxFuture<'a, Result<(), CompanionError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    sessions: Mutex<HashMap<SessionId, Vec<Content>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn load_turns<'a>(
        &'a self,
        session: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<Content>, CompanionError>> {
        Box::pin(async move {
            let sessions = self
                .sessions
                .lock()
                .map_err(|_| CompanionError::store("conversation store lock poisoned"))?;

            Ok(sessions.get(session).cloned().unwrap_or_default())
        })
    }

    fn append_turns<'a>(
        &'a self,
        session: &'a SessionId,
        turns: Vec<Content>,
    ) -> BoxFuture<'a, Result<(), CompanionError>> {
        Box::pin(async move {
            let mut sessions = self
                .sessions
                .lock()
                .map_err(|_| CompanionError::store("conversation store lock poisoned"))?;

            sessions.entry(session.clone()).or_default().extend(turns);

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = InMemoryConversationStore::new();
        let first = SessionId::from("first");
        let second = SessionId::from("second");

        store
            .append_turns(&first, vec![Content::user("a floating city")])
            .await
            .expect("append");

        assert_eq!(store.load_turns(&first).await.expect("load").len(), 1);
        assert!(store.load_turns(&second).await.expect("load").is_empty());
    }
}
