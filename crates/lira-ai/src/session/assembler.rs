//! Turn assembly: resolve the session, replay history to the model, record
//! the reply.

use std::sync::Arc;

use lira_common::{GatewayError, SessionId};
use tracing::{debug, info, warn};

use crate::prompt::PromptTemplate;
use crate::AiClient;

use super::store::SessionStore;
use super::types::Turn;

/// Result of one ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskOutcome {
    pub response: String,
    pub session_id: SessionId,
    pub new_session_created: bool,
}

/// Drives a question through the session store and the model client.
#[derive(Clone)]
pub struct TurnAssembler {
    store: SessionStore,
    client: Arc<dyn AiClient>,
    template: PromptTemplate,
}

impl TurnAssembler {
    pub fn new(store: SessionStore, client: Arc<dyn AiClient>) -> Self {
        Self {
            store,
            client,
            template: PromptTemplate::default(),
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Ask `query` within `session_id`, or within a fresh session when the id
    /// is absent or unknown.
    ///
    /// The user turn is recorded before the model is called. On model failure
    /// it stays recorded and no assistant turn is added, so resubmitting with
    /// the same id continues from a consistent history.
    pub async fn ask(
        &self,
        query: &str,
        session_id: Option<&str>,
    ) -> Result<AskOutcome, GatewayError> {
        if query.trim().is_empty() {
            return Err(GatewayError::InvalidInput("query must not be empty".into()));
        }

        let existing = match session_id {
            Some(raw) => {
                let id = SessionId::from(raw);
                self.store.writer(&id).await.map(|writer| (id, writer))
            }
            None => None,
        };

        let (id, _guard, new_session_created) = match existing {
            Some((id, writer)) => (id, writer.lock_owned().await, false),
            None => {
                if let Some(raw) = session_id {
                    debug!(requested = %raw, "unknown session id, starting a new session");
                }
                let (session, guard) = self.store.create_locked(query).await;
                (session.id().clone(), guard, true)
            }
        };

        if !new_session_created {
            self.store.append(&id, Turn::user(query)).await?;
        }

        let snapshot = self.store.get(&id).await?;
        let messages = self.template.build_context(snapshot.turns());

        info!(
            session_id = %id,
            new_session = new_session_created,
            turns = snapshot.turns().len(),
            "invoking model"
        );

        let response = match self.client.send_message(&messages).await {
            Ok(response) => response,
            Err(e) => {
                warn!(session_id = %id, error = %e, "model invocation failed");
                return Err(e.into());
            }
        };

        self.store
            .append(&id, Turn::assistant(response.content.clone()))
            .await?;

        Ok(AskOutcome {
            response: response.content,
            session_id: id,
            new_session_created,
        })
    }
}
