//! Chat session controllers.
//!
//! A turn goes `Idle → Sending → Idle`. While one is in flight a second
//! `send_turn` fails with [`SyncError::Busy`]. Every accepted user message
//! is followed by exactly one bot message: the answer, a "no answer" text
//! when the reply is empty, or an apology when the call fails.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use rae_core::dates::clock_time;
use rae_core::entities::{ChatMessage, ReportMatch, SourceDocument};
use rae_core::enums::Sender;
use rae_store::RemoteStore;
use rae_webhooks::{ChatReply, WebhookError, Webhooks};

use crate::context::AppContext;
use crate::error::SyncError;
use crate::notices::Notices;
use crate::orchestrator::InFlight;

pub const NO_ANSWER: &str = "Sorry, I could not generate an answer.";
pub const APOLOGY: &str = "Sorry, something went wrong while talking to the assistant.";

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn message(sender: Sender, text: impl Into<String>) -> ChatMessage {
    ChatMessage {
        id: format!("msg-{}", Uuid::new_v4()),
        sender,
        text: text.into(),
        time: clock_time(),
        source_documents: None,
    }
}

/// Transcript plus the single-turn guard, shared by both controllers.
struct Conversation {
    store: Arc<dyn RemoteStore>,
    notices: Arc<Notices>,
    transcript: Mutex<Vec<ChatMessage>>,
    /// Bumped on every reset; a reply for an older epoch is dropped.
    epoch: Mutex<u64>,
    sending: InFlight,
}

impl Conversation {
    fn new(ctx: &AppContext) -> Self {
        Self {
            store: Arc::clone(&ctx.store),
            notices: Arc::clone(&ctx.notices),
            transcript: Mutex::new(Vec::new()),
            epoch: Mutex::new(0),
            sending: InFlight::new("chat turn"),
        }
    }

    fn reset(&self) {
        lock(&self.transcript).clear();
        *lock(&self.epoch) += 1;
    }

    fn transcript(&self) -> Vec<ChatMessage> {
        lock(&self.transcript).clone()
    }

    /// Run one turn. `ask` performs the remote call.
    async fn turn<F, Fut>(&self, text: &str, ask: F) -> Result<ChatMessage, SyncError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<ChatReply, WebhookError>>,
    {
        let query = text.trim();
        if query.is_empty() {
            return Err(SyncError::validation("message is empty"));
        }
        let _guard = self.sending.try_start()?;
        let epoch = *lock(&self.epoch);
        lock(&self.transcript).push(message(Sender::User, query));

        let reply = match ask(query.to_string()).await {
            Ok(reply) => {
                let mut bot = message(
                    Sender::Bot,
                    reply
                        .answer
                        .filter(|a| !a.trim().is_empty())
                        .unwrap_or_else(|| NO_ANSWER.to_string()),
                );
                let sources = self.resolve_sources(&reply.document_ids).await;
                bot.source_documents = (!sources.is_empty()).then_some(sources);
                bot
            }
            Err(e) => {
                self.notices
                    .error("Error", format!("Unable to reach the assistant: {e}"));
                message(Sender::Bot, APOLOGY)
            }
        };

        if *lock(&self.epoch) == epoch {
            lock(&self.transcript).push(reply.clone());
        } else {
            tracing::debug!("chat scope changed during the turn, reply dropped");
        }
        Ok(reply)
    }

    /// Titles of cited documents. A lookup failure yields no sources.
    async fn resolve_sources(&self, ids: &[String]) -> Vec<SourceDocument> {
        if ids.is_empty() {
            return Vec::new();
        }
        match self.store.documents_by_ids(ids).await {
            Ok(sources) => sources,
            Err(e) => {
                tracing::warn!(error = %e, "could not resolve chat sources");
                Vec::new()
            }
        }
    }
}

// ── Report chat ────────────────────────────────────────────────────

/// Conversation with the report knowledge base.
///
/// Changing the scope (selecting a report or clearing it) empties the
/// transcript and starts a new session id. The scope itself is not sent
/// with the query.
pub struct ChatSession {
    webhooks: Arc<dyn Webhooks>,
    conversation: Conversation,
    session_id: Mutex<String>,
    scope: Mutex<Option<ReportMatch>>,
}

impl ChatSession {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            webhooks: Arc::clone(&ctx.webhooks),
            conversation: Conversation::new(ctx),
            session_id: Mutex::new(Uuid::new_v4().to_string()),
            scope: Mutex::new(None),
        }
    }

    pub fn session_id(&self) -> String {
        lock(&self.session_id).clone()
    }

    pub fn scope(&self) -> Option<ReportMatch> {
        lock(&self.scope).clone()
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.conversation.transcript()
    }

    pub fn is_sending(&self) -> bool {
        self.conversation.sending.is_running()
    }

    fn restart(&self, scope: Option<ReportMatch>) {
        self.conversation.reset();
        let mut session = lock(&self.session_id);
        let mut fresh = Uuid::new_v4().to_string();
        while fresh == *session {
            fresh = Uuid::new_v4().to_string();
        }
        *session = fresh;
        *lock(&self.scope) = scope;
    }

    /// Narrow the conversation to one report.
    pub fn select_report(&self, report: ReportMatch) {
        self.conversation.notices.info(
            "Report selected",
            format!("You are now chatting about {}", report.name),
        );
        self.restart(Some(report));
    }

    /// Return to querying every report.
    pub fn clear_scope(&self) {
        self.restart(None);
    }

    /// Send one user message and append the bot reply.
    ///
    /// A failed call is not an error here: the apology is appended and
    /// returned, and an error notice is recorded.
    ///
    /// # Errors
    ///
    /// Validation error for blank text, or [`SyncError::Busy`] while a turn
    /// is in flight.
    pub async fn send_turn(&self, text: &str) -> Result<ChatMessage, SyncError> {
        let session_id = self.session_id();
        let webhooks = Arc::clone(&self.webhooks);
        self.conversation
            .turn(text, |query| async move {
                webhooks.report_chat(&query, &session_id).await
            })
            .await
    }
}

// ── Project chat ───────────────────────────────────────────────────

/// Conversation about one project's documents.
pub struct ProjectChat {
    webhooks: Arc<dyn Webhooks>,
    conversation: Conversation,
    project_id: String,
    source_ids: Mutex<Vec<String>>,
}

impl ProjectChat {
    /// `source_ids` are the ids of the project's documents.
    pub fn new(ctx: &AppContext, project_id: &str, source_ids: Vec<String>) -> Self {
        Self {
            webhooks: Arc::clone(&ctx.webhooks),
            conversation: Conversation::new(ctx),
            project_id: project_id.to_string(),
            source_ids: Mutex::new(source_ids),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Replace the document ids sent with each query, e.g. after an import.
    pub fn set_sources(&self, source_ids: Vec<String>) {
        *lock(&self.source_ids) = source_ids;
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.conversation.transcript()
    }

    pub fn is_sending(&self) -> bool {
        self.conversation.sending.is_running()
    }

    pub fn clear(&self) {
        self.conversation.reset();
    }

    /// Send one user message and append the bot reply.
    ///
    /// # Errors
    ///
    /// Validation error for blank text, or [`SyncError::Busy`] while a turn
    /// is in flight.
    pub async fn send_turn(&self, text: &str) -> Result<ChatMessage, SyncError> {
        let sources = lock(&self.source_ids).clone();
        let webhooks = Arc::clone(&self.webhooks);
        let project_id = self.project_id.clone();
        self.conversation
            .turn(text, |query| async move {
                webhooks.project_chat(&project_id, &query, &sources).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context_with;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rae_core::entities::Document;
    use rae_store::InMemoryStore;
    use std::collections::HashSet;

    fn doc(id: &str, title: &str) -> Document {
        Document {
            id: id.into(),
            title: title.into(),
            project_id: None,
            document_type: None,
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
            url: None,
            cover_url: None,
            rapport: true,
        }
    }

    fn texts(messages: &[ChatMessage]) -> Vec<(Sender, String)> {
        messages.iter().map(|m| (m.sender, m.text.clone())).collect()
    }

    #[tokio::test]
    async fn reply_carries_resolved_sources() {
        let store = InMemoryStore::new();
        store.push_document(doc("d1", "Diagnostic Usine"));
        let (ctx, _, hooks) = context_with(store);
        hooks.set_chat_reply(Some("Oui, au R+1."), &["d1", "gone"]);
        let chat = ChatSession::new(&ctx);

        let reply = chat.send_turn("  amiante ?  ").await.unwrap();
        assert_eq!(reply.text, "Oui, au R+1.");
        let titles: Vec<String> = reply
            .source_documents
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Diagnostic Usine"]);
        assert_eq!(
            texts(&chat.transcript()),
            vec![
                (Sender::User, "amiante ?".to_string()),
                (Sender::Bot, "Oui, au R+1.".to_string()),
            ]
        );
        let session = chat.session_id();
        assert_eq!(hooks.calls(), vec![format!("report_chat s={session} amiante ?")]);
    }

    #[tokio::test]
    async fn missing_answer_uses_fallback_text() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        hooks.set_chat_reply(None, &[]);
        let chat = ChatSession::new(&ctx);
        let reply = chat.send_turn("bonjour").await.unwrap();
        assert_eq!(reply.text, NO_ANSWER);
        assert_eq!(reply.source_documents, None);
    }

    #[tokio::test]
    async fn transport_failure_appends_apology() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        hooks.fail("report_chat");
        let chat = ChatSession::new(&ctx);
        let reply = chat.send_turn("bonjour").await.unwrap();
        assert_eq!(reply.text, APOLOGY);
        assert_eq!(chat.transcript().len(), 2);
        assert!(ctx.notices.has_errors());
        assert!(!chat.is_sending());
    }

    #[tokio::test]
    async fn source_lookup_failure_shows_no_sources() {
        let store = InMemoryStore::new();
        store.fail_on("documents_by_ids");
        let (ctx, _, hooks) = context_with(store);
        hooks.set_chat_reply(Some("Réponse"), &["d1"]);
        let chat = ChatSession::new(&ctx);
        let reply = chat.send_turn("q").await.unwrap();
        assert_eq!(reply.text, "Réponse");
        assert_eq!(reply.source_documents, None);
    }

    #[tokio::test]
    async fn blank_message_is_rejected_without_a_call() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        let chat = ChatSession::new(&ctx);
        assert!(chat.send_turn("   ").await.unwrap_err().is_validation());
        assert!(chat.transcript().is_empty());
        assert!(hooks.calls().is_empty());
    }

    #[tokio::test]
    async fn second_turn_is_rejected_while_sending() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        hooks.set_chat_reply(Some("ok"), &[]);
        let gate = hooks.gate_chat();
        let chat = Arc::new(ChatSession::new(&ctx));

        let first = tokio::spawn({
            let chat = Arc::clone(&chat);
            async move { chat.send_turn("first").await }
        });
        while !chat.is_sending() {
            tokio::task::yield_now().await;
        }
        let err = chat.send_turn("hello").await.unwrap_err();
        assert!(matches!(err, SyncError::Busy { .. }), "{err:?}");

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert!(!chat.is_sending());
        assert_eq!(chat.transcript().len(), 2);
        gate.notify_one();
        chat.send_turn("hello").await.unwrap();
        assert_eq!(chat.transcript().len(), 4);
    }

    #[tokio::test]
    async fn scope_changes_reset_transcript_and_session() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        hooks.set_chat_reply(Some("ok"), &[]);
        let chat = ChatSession::new(&ctx);
        let mut seen = HashSet::from([chat.session_id()]);

        chat.send_turn("q").await.unwrap();
        chat.select_report(ReportMatch {
            id: "r1".into(),
            name: "Diagnostic".into(),
            project_name: None,
            client_name: None,
        });
        assert!(chat.transcript().is_empty());
        assert_eq!(chat.scope().map(|r| r.id), Some("r1".to_string()));
        assert!(seen.insert(chat.session_id()));

        chat.send_turn("q").await.unwrap();
        chat.clear_scope();
        assert!(chat.transcript().is_empty());
        assert_eq!(chat.scope(), None);
        assert!(seen.insert(chat.session_id()));
    }

    #[tokio::test]
    async fn project_chat_sends_document_ids() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        hooks.set_chat_reply(Some("Bilan positif"), &[]);
        let chat = ProjectChat::new(&ctx, "p1", vec!["d1".into(), "d2".into()]);
        let reply = chat.send_turn("bilan ?").await.unwrap();
        assert_eq!(reply.text, "Bilan positif");
        chat.set_sources(vec![]);
        chat.send_turn("encore ?").await.unwrap();
        assert_eq!(
            hooks.calls(),
            vec!["project_chat p=p1 n=2 bilan ?", "project_chat p=p1 n=0 encore ?"]
        );
        chat.clear();
        assert!(chat.transcript().is_empty());
    }
}
