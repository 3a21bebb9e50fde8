//! Tests for the session store and the turn assembler.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lira_common::{GatewayError, SessionId};

use super::*;
use crate::{AiClient, AiError, AiResponse, Message, PromptTemplate, Role, TokenUsage};

/// Replies from a script (echoing when the script runs dry) and records every
/// context it was sent.
#[derive(Default)]
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedClient {
    fn with_replies(replies: Vec<Result<String, AiError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiClient for ScriptedClient {
    async fn send_message(&self, messages: &[Message]) -> Result<AiResponse, AiError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let next = self.replies.lock().unwrap().pop_front();
        let content = match next {
            Some(reply) => reply?,
            None => {
                let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
                format!("echo: {last}")
            }
        };
        Ok(AiResponse {
            content,
            usage: TokenUsage::default(),
        })
    }
}

fn assembler(client: Arc<ScriptedClient>) -> TurnAssembler {
    TurnAssembler::new(SessionStore::new(), client)
}

// -- store ------------------------------------------------------------------

#[tokio::test]
async fn create_sets_title_and_first_turn() {
    let store = SessionStore::new();
    let session = store.create("hello").await;

    assert_eq!(session.title(), "hello");
    assert_eq!(session.turns(), &[Turn::user("hello")]);
    assert_eq!(store.get(session.id()).await.unwrap(), session);
}

#[tokio::test]
async fn get_unknown_is_not_found() {
    let store = SessionStore::new();
    let err = store.get(&SessionId::from("nope")).await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound(ref id) if id == "nope"));
}

#[tokio::test]
async fn append_unknown_is_not_found() {
    let store = SessionStore::new();
    let err = store
        .append(&SessionId::from("nope"), Turn::assistant("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::NotFound(_)));
}

#[tokio::test]
async fn append_keeps_order_and_title() {
    let store = SessionStore::new();
    let id = store.create("first").await.id().clone();
    store.append(&id, Turn::assistant("reply")).await.unwrap();
    store.append(&id, Turn::user("second")).await.unwrap();

    let session = store.get(&id).await.unwrap();
    assert_eq!(session.title(), "first");
    assert_eq!(
        session.turns(),
        &[
            Turn::user("first"),
            Turn::assistant("reply"),
            Turn::user("second")
        ]
    );
}

#[tokio::test]
async fn list_is_in_creation_order() {
    let store = SessionStore::new();
    assert_eq!(store.len().await, 0);

    let a = store.create("a").await;
    let b = store.create("b").await;
    let c = store.create("c").await;

    let titles: Vec<_> = store.list().await.into_iter().map(|s| s.title).collect();
    assert_eq!(titles, ["a", "b", "c"]);
    assert_eq!(store.list().await, store.list().await);
    assert_eq!(store.len().await, 3);
    assert!(store.get(a.id()).await.is_ok());
    assert_ne!(a.id(), b.id());
    assert_ne!(b.id(), c.id());
}

#[tokio::test]
async fn store_clones_share_state() {
    let store = SessionStore::new();
    let other = store.clone();
    let session = store.create("shared").await;
    assert_eq!(other.get(session.id()).await.unwrap(), session);
}

#[tokio::test]
async fn create_locked_holds_writer_before_session_is_visible() {
    let store = SessionStore::new();
    let (session, guard) = store.create_locked("first").await;

    assert_eq!(store.list().await.len(), 1);
    let writer = store.writer(session.id()).await.unwrap();
    assert!(writer.try_lock().is_err());

    drop(guard);
    assert!(writer.try_lock().is_ok());
}

#[tokio::test]
async fn ask_on_a_just_created_session_waits_for_its_creator() {
    let store = SessionStore::new();
    let client = Arc::new(ScriptedClient::default());
    let asm = TurnAssembler::new(store.clone(), client);

    // Stand in for the creator mid-exchange: session visible, writer held.
    let (session, guard) = store.create_locked("first").await;
    let id = session.id().to_string();

    let follow_up = tokio::spawn({
        let asm = asm.clone();
        let id = id.clone();
        async move { asm.ask("second", Some(&id)).await }
    });
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(store.get(session.id()).await.unwrap().turns(), &[Turn::user("first")]);

    store
        .append(session.id(), Turn::assistant("first answer"))
        .await
        .unwrap();
    drop(guard);

    let outcome = follow_up.await.unwrap().unwrap();
    assert!(!outcome.new_session_created);
    assert_eq!(
        store.get(session.id()).await.unwrap().turns(),
        &[
            Turn::user("first"),
            Turn::assistant("first answer"),
            Turn::user("second"),
            Turn::assistant("echo: second"),
        ]
    );
}

// -- assembler --------------------------------------------------------------

#[tokio::test]
async fn ask_without_id_creates_distinct_sessions() {
    let client = Arc::new(ScriptedClient::default());
    let asm = assembler(client);

    let mut ids = HashSet::new();
    for q in ["one", "two", "three"] {
        let outcome = asm.ask(q, None).await.unwrap();
        assert!(outcome.new_session_created);
        let session = asm.store().get(&outcome.session_id).await.unwrap();
        assert_eq!(session.title(), q);
        ids.insert(outcome.session_id);
    }
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn hello_scenario() {
    let client = Arc::new(ScriptedClient::with_replies(vec![Ok("Hi there!".into())]));
    let asm = assembler(client.clone());

    let outcome = asm.ask("hello", None).await.unwrap();
    assert_eq!(outcome.response, "Hi there!");
    assert!(outcome.new_session_created);

    let session = asm.store().get(&outcome.session_id).await.unwrap();
    assert_eq!(session.title(), "hello");
    assert_eq!(
        session.turns(),
        &[Turn::user("hello"), Turn::assistant("Hi there!")]
    );

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0][0].role, Role::System);
    assert_eq!(calls[0][1], Message::user("hello"));
}

#[tokio::test]
async fn follow_up_reuses_session_and_replays_history() {
    let client = Arc::new(ScriptedClient::with_replies(vec![
        Ok("Hi there!".into()),
        Ok("Sure.".into()),
    ]));
    let asm = assembler(client.clone());

    let first = asm.ask("hello", None).await.unwrap();
    let id = first.session_id.to_string();
    let second = asm.ask("follow up", Some(&id)).await.unwrap();

    assert!(!second.new_session_created);
    assert_eq!(second.session_id.as_str(), id);
    assert_eq!(second.response, "Sure.");

    let ctx = &client.calls()[1];
    assert_eq!(
        &ctx[1..],
        &[
            Message::user("hello"),
            Message::assistant("Hi there!"),
            Message::user("follow up"),
        ]
    );
}

#[tokio::test]
async fn unknown_id_behaves_like_no_id() {
    let client = Arc::new(ScriptedClient::default());
    let asm = assembler(client);

    let outcome = asm.ask("hi", Some("not-a-real-id")).await.unwrap();
    assert!(outcome.new_session_created);
    assert_ne!(outcome.session_id.as_str(), "not-a-real-id");
    assert!(asm.store().get(&SessionId::from("not-a-real-id")).await.is_err());

    let session = asm.store().get(&outcome.session_id).await.unwrap();
    assert_eq!(session.title(), "hi");
    assert_eq!(session.turns().len(), 2);
}

#[tokio::test]
async fn turns_alternate_after_n_asks() {
    let client = Arc::new(ScriptedClient::default());
    let asm = assembler(client);

    let id = asm.ask("q0", None).await.unwrap().session_id.to_string();
    for i in 1..5 {
        asm.ask(&format!("q{i}"), Some(&id)).await.unwrap();
    }

    let session = asm.store().get(&SessionId::from(id.as_str())).await.unwrap();
    let turns = session.turns();
    assert_eq!(turns.len(), 10);
    for (i, turn) in turns.iter().enumerate() {
        let expected = if i % 2 == 0 {
            Speaker::User
        } else {
            Speaker::Assistant
        };
        assert_eq!(turn.speaker(), expected, "turn {i}");
    }
    assert_eq!(session.title(), "q0");
}

#[tokio::test]
async fn model_failure_keeps_user_turn_only() {
    let client = Arc::new(ScriptedClient::with_replies(vec![
        Ok("first answer".into()),
        Err(AiError::Timeout),
        Ok("recovered".into()),
    ]));
    let asm = assembler(client.clone());

    let id = asm.ask("hello", None).await.unwrap().session_id;

    let err = asm.ask("slow question", Some(id.as_str())).await.unwrap_err();
    assert!(matches!(err, GatewayError::ModelInvocation(_)));

    let session = asm.store().get(&id).await.unwrap();
    assert_eq!(session.turns().len(), 3);
    assert_eq!(session.turns()[2], Turn::user("slow question"));

    let retry = asm.ask("slow question", Some(id.as_str())).await.unwrap();
    assert_eq!(retry.response, "recovered");
    assert!(!retry.new_session_created);

    let session = asm.store().get(&id).await.unwrap();
    assert_eq!(session.turns().len(), 5);
    assert_eq!(session.turns()[4], Turn::assistant("recovered"));
}

#[tokio::test]
async fn failure_on_first_ask_still_creates_session() {
    let client = Arc::new(ScriptedClient::with_replies(vec![Err(AiError::NetworkError(
        "connection refused".into(),
    ))]));
    let asm = assembler(client);

    let err = asm.ask("hello", None).await.unwrap_err();
    assert!(err.to_string().contains("connection refused"));

    let sessions = asm.store().list().await;
    assert_eq!(sessions.len(), 1);
    let session = asm.store().get(&sessions[0].id).await.unwrap();
    assert_eq!(session.turns(), &[Turn::user("hello")]);
}

#[tokio::test]
async fn blank_query_is_invalid_input() {
    let client = Arc::new(ScriptedClient::default());
    let asm = assembler(client.clone());

    let err = asm.ask("   ", None).await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidInput(_)));
    assert_eq!(asm.store().len().await, 0);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn custom_template_is_sent_first() {
    let client = Arc::new(ScriptedClient::default());
    let asm = assembler(client.clone()).with_template(PromptTemplate::new("pirate mode"));

    asm.ask("ahoy", None).await.unwrap();
    assert_eq!(client.calls()[0][0], Message::system("pirate mode"));
}

#[tokio::test]
async fn concurrent_asks_on_one_session_serialize() {
    let client = Arc::new(ScriptedClient::default());
    let asm = assembler(client);
    let id = asm.ask("start", None).await.unwrap().session_id.to_string();

    let mut handles = Vec::new();
    for i in 0..8 {
        let asm = asm.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            asm.ask(&format!("q{i}"), Some(&id)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let session = asm.store().get(&SessionId::from(id.as_str())).await.unwrap();
    let turns = session.turns();
    assert_eq!(turns.len(), 18);
    for pair in turns.chunks(2) {
        assert_eq!(pair[0].speaker(), Speaker::User);
        assert_eq!(pair[1].speaker(), Speaker::Assistant);
        assert_eq!(pair[1].text(), format!("echo: {}", pair[0].text()));
    }
}
