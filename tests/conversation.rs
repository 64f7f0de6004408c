//! Session loop and restart controller tests with scripted console I/O and a
//! canned transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use gemma_chat::chat::{
    ChatConfig, ChatSession, ConversationEnd, Input, Interrupt, LineSource, RESTART_PROMPT,
    Renderer, Shutdown, USER_PROMPT, run, run_conversation,
};
use gemma_chat::{ChatRequest, ChatTransport, Error, Result, Turn};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Welcome,
    Thinking,
    Reply(String),
    Error(String),
    Exiting,
    Farewell,
    Interrupted,
}

#[derive(Default)]
struct RecordingRenderer {
    events: Vec<Event>,
}

impl Renderer for RecordingRenderer {
    fn print_welcome(&mut self) {
        self.events.push(Event::Welcome);
    }

    fn print_thinking(&mut self) {
        self.events.push(Event::Thinking);
    }

    fn print_reply(&mut self, reply: &str) {
        self.events.push(Event::Reply(reply.to_string()));
    }

    fn print_error(&mut self, error: &str) {
        self.events.push(Event::Error(error.to_string()));
    }

    fn print_exiting(&mut self) {
        self.events.push(Event::Exiting);
    }

    fn print_farewell(&mut self) {
        self.events.push(Event::Farewell);
    }

    fn print_interrupted(&mut self) {
        self.events.push(Event::Interrupted);
    }
}

struct ScriptedInput {
    script: VecDeque<Input>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    fn lines(lines: &[&str]) -> Self {
        Self::new(lines.iter().map(|l| Input::Line(l.to_string())).collect())
    }

    fn new(script: Vec<Input>) -> Self {
        Self {
            script: script.into(),
            prompts: Vec::new(),
        }
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        self.prompts.push(prompt.to_string());
        Ok(self.script.pop_front().unwrap_or(Input::Eof))
    }
}

#[derive(Clone, Default)]
struct CannedTransport {
    replies: Arc<Mutex<VecDeque<Result<String>>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl CannedTransport {
    fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChatTransport for CannedTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }
}

/// Never answers; used to exercise interrupts while a request is in flight.
struct StalledTransport;

#[async_trait::async_trait]
impl ChatTransport for StalledTransport {
    async fn complete(&self, _: &ChatRequest) -> Result<String> {
        futures::future::pending().await
    }
}

fn new_session(transport: CannedTransport) -> ChatSession<CannedTransport> {
    ChatSession::new(transport, ChatConfig::default())
}

#[tokio::test]
async fn exit_keywords_end_conversation_without_a_turn() {
    for keyword in ["exit", "EXIT", "quit", "  Quit  "] {
        let transport = CannedTransport::default();
        let mut session = new_session(transport.clone());
        let mut input = ScriptedInput::lines(&[keyword]);
        let mut renderer = RecordingRenderer::default();

        let end = run_conversation(&mut session, &mut input, &mut renderer, &Interrupt::new())
            .await
            .unwrap();

        assert_eq!(end, ConversationEnd::Exited, "{keyword:?}");
        assert!(session.transcript().is_empty(), "{keyword:?}");
        assert!(transport.requests().is_empty(), "{keyword:?}");
        assert_eq!(renderer.events, vec![Event::Welcome, Event::Exiting]);
    }
}

#[tokio::test]
async fn exchange_is_rendered_and_recorded() {
    let transport = CannedTransport::new(vec![Ok("Hello".to_string())]);
    let mut session = new_session(transport.clone());
    let mut input = ScriptedInput::lines(&["hi", "exit"]);
    let mut renderer = RecordingRenderer::default();

    run_conversation(&mut session, &mut input, &mut renderer, &Interrupt::new())
        .await
        .unwrap();

    assert_eq!(
        renderer.events,
        vec![
            Event::Welcome,
            Event::Thinking,
            Event::Reply("Hello".to_string()),
            Event::Exiting,
        ]
    );
    assert_eq!(
        session.transcript().turns(),
        &[Turn::user("hi"), Turn::assistant("Hello")]
    );
    assert_eq!(input.prompts, vec![USER_PROMPT, USER_PROMPT]);
    assert_eq!(
        serde_json::to_value(&transport.requests()[0]).unwrap(),
        serde_json::json!({
            "model": "gemma3:1b-it-q4_K_M",
            "messages": [{"role": "user", "content": "hi"}]
        })
    );
}

#[tokio::test]
async fn transport_failure_is_reported_and_loop_continues() {
    let transport = CannedTransport::new(vec![
        Err(Error::timeout("no response from server", Some(30.0))),
        Ok("second try".to_string()),
    ]);
    let mut session = new_session(transport.clone());
    let mut input = ScriptedInput::lines(&["hi", "again", "quit"]);
    let mut renderer = RecordingRenderer::default();

    let end = run_conversation(&mut session, &mut input, &mut renderer, &Interrupt::new())
        .await
        .unwrap();

    assert_eq!(end, ConversationEnd::Exited);
    assert!(matches!(&renderer.events[2], Event::Error(msg) if msg.contains("Timeout")));
    assert_eq!(renderer.events[4], Event::Reply("second try".to_string()));
    // The prompt came back after the failure.
    assert_eq!(input.prompts.len(), 3);
    // The failed user turn was kept and sent along with the next one.
    assert_eq!(
        session.transcript().turns(),
        &[
            Turn::user("hi"),
            Turn::user("again"),
            Turn::assistant("second try"),
        ]
    );
    assert_eq!(transport.requests()[1].messages.len(), 2);
}

#[tokio::test]
async fn blank_lines_are_sent_like_any_message() {
    let transport = CannedTransport::new(vec![Ok("Yes?".to_string()), Ok("Hm?".to_string())]);
    let mut session = new_session(transport.clone());
    let mut input = ScriptedInput::lines(&["", "   ", "exit"]);
    let mut renderer = RecordingRenderer::default();

    run_conversation(&mut session, &mut input, &mut renderer, &Interrupt::new())
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].messages, vec![Turn::user("")]);
    assert_eq!(
        session.transcript().turns(),
        &[
            Turn::user(""),
            Turn::assistant("Yes?"),
            Turn::user("   "),
            Turn::assistant("Hm?"),
        ]
    );
    assert_eq!(
        renderer.events,
        vec![
            Event::Welcome,
            Event::Thinking,
            Event::Reply("Yes?".to_string()),
            Event::Thinking,
            Event::Reply("Hm?".to_string()),
            Event::Exiting,
        ]
    );
}

#[tokio::test]
async fn declining_restart_ends_the_program() {
    let mut session = new_session(CannedTransport::default());
    let mut input = ScriptedInput::lines(&["exit", "n"]);
    let mut renderer = RecordingRenderer::default();

    let shutdown = run(&mut session, &mut input, &mut renderer, &Interrupt::new())
        .await
        .unwrap();

    assert_eq!(shutdown, Shutdown::Finished);
    assert_eq!(input.prompts, vec![USER_PROMPT, RESTART_PROMPT]);
    assert_eq!(renderer.events.last(), Some(&Event::Farewell));
}

#[tokio::test]
async fn any_answer_but_y_ends_the_program() {
    for answer in ["yes", "no", "", "  n "] {
        let mut session = new_session(CannedTransport::default());
        let mut input = ScriptedInput::lines(&["quit", answer]);
        let mut renderer = RecordingRenderer::default();

        let shutdown = run(&mut session, &mut input, &mut renderer, &Interrupt::new())
            .await
            .unwrap();

        assert_eq!(shutdown, Shutdown::Finished, "{answer:?}");
        assert_eq!(input.prompts.len(), 2, "{answer:?}");
    }
}

#[tokio::test]
async fn restart_begins_with_empty_transcript() {
    let transport = CannedTransport::new(vec![Ok("first".to_string()), Ok("second".to_string())]);
    let mut session = new_session(transport.clone());
    let mut input = ScriptedInput::lines(&["one", "exit", " Y ", "two", "exit", "n"]);
    let mut renderer = RecordingRenderer::default();

    let shutdown = run(&mut session, &mut input, &mut renderer, &Interrupt::new())
        .await
        .unwrap();

    assert_eq!(shutdown, Shutdown::Finished);
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].messages, vec![Turn::user("two")]);
    assert_eq!(
        renderer
            .events
            .iter()
            .filter(|e| **e == Event::Welcome)
            .count(),
        2
    );
}

#[tokio::test]
async fn ctrl_c_at_prompt_says_goodbye() {
    let interrupt = Interrupt::new();
    let mut session = new_session(CannedTransport::default());
    let mut input = ScriptedInput::new(vec![Input::Interrupted]);
    let mut renderer = RecordingRenderer::default();

    let shutdown = run(&mut session, &mut input, &mut renderer, &interrupt)
        .await
        .unwrap();

    assert_eq!(shutdown, Shutdown::Interrupted);
    assert_eq!(renderer.events, vec![Event::Welcome, Event::Interrupted]);
    // The signal handler must not print it a second time.
    assert!(!interrupt.claim_goodbye());
}

#[tokio::test]
async fn goodbye_already_printed_by_signal_handler_is_not_repeated() {
    let interrupt = Interrupt::new();
    interrupt.trigger();
    assert!(interrupt.claim_goodbye());
    let mut session = new_session(CannedTransport::default());
    let mut input = ScriptedInput::lines(&["never read"]);
    let mut renderer = RecordingRenderer::default();

    let shutdown = run(&mut session, &mut input, &mut renderer, &interrupt)
        .await
        .unwrap();

    assert_eq!(shutdown, Shutdown::Interrupted);
    assert!(input.prompts.is_empty());
    assert_eq!(renderer.events, vec![Event::Welcome]);
}

#[tokio::test]
async fn ctrl_c_at_restart_prompt_says_goodbye() {
    let mut session = new_session(CannedTransport::default());
    let mut input = ScriptedInput::new(vec![Input::Line("exit".to_string()), Input::Interrupted]);
    let mut renderer = RecordingRenderer::default();

    let shutdown = run(&mut session, &mut input, &mut renderer, &Interrupt::new())
        .await
        .unwrap();

    assert_eq!(shutdown, Shutdown::Interrupted);
    assert_eq!(renderer.events.last(), Some(&Event::Interrupted));
    assert!(!renderer.events.contains(&Event::Farewell));
}

#[tokio::test]
async fn ctrl_c_during_request_cancels_it() {
    let interrupt = Interrupt::new();
    let mut session = ChatSession::new(StalledTransport, ChatConfig::default());
    let mut input = ScriptedInput::lines(&["hi", "never read"]);
    let mut renderer = RecordingRenderer::default();

    let trigger = interrupt.clone();
    tokio::spawn(async move {
        tokio::task::yield_now().await;
        trigger.trigger();
    });

    let shutdown = run(&mut session, &mut input, &mut renderer, &interrupt)
        .await
        .unwrap();

    assert_eq!(shutdown, Shutdown::Interrupted);
    assert_eq!(input.prompts, vec![USER_PROMPT]);
    assert_eq!(
        renderer.events,
        vec![Event::Welcome, Event::Thinking, Event::Interrupted]
    );
}

#[tokio::test]
async fn end_of_input_ends_the_program() {
    let mut session = new_session(CannedTransport::default());
    let mut input = ScriptedInput::new(Vec::new());
    let mut renderer = RecordingRenderer::default();

    let shutdown = run(&mut session, &mut input, &mut renderer, &Interrupt::new())
        .await
        .unwrap();

    assert_eq!(shutdown, Shutdown::Finished);
    assert_eq!(input.prompts, vec![USER_PROMPT]);
    assert_eq!(renderer.events, vec![Event::Welcome, Event::Farewell]);
}
