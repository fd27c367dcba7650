use std::sync::Once;

use console_core::{
    update, AppState, ContextId, ContextSummary, Effect, LogEntry, MessageKind, Msg, PollSnapshot,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(console_logging::initialize_for_tests);
}

fn snapshot(context: &str, guid: &str, version: u64, contexts: &[&str]) -> PollSnapshot {
    PollSnapshot {
        ok: true,
        context: ContextId::from(context),
        log_guid: guid.to_string(),
        log_version: version,
        logs: vec![LogEntry::new(0, MessageKind::User, "", "hi")],
        paused: false,
        contexts: contexts.iter().copied().map(ContextSummary::new).collect(),
    }
}

/// Runs one full poll round trip answered with `snapshot`.
fn poll(state: AppState, snapshot: PollSnapshot) -> AppState {
    let (state, effects) = update(state, Msg::PollTick);
    let requested = match effects.as_slice() {
        [Effect::Poll { context, .. }] => context.clone(),
        other => panic!("expected a single poll effect, got {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::PollCompleted {
            requested,
            snapshot,
        },
    );
    state
}

#[test]
fn switching_context_resets_log_tracking() {
    init_logging();
    let state = poll(AppState::new(), snapshot("A", "g1", 3, &["A", "B"]));
    assert_eq!(state.context().as_str(), "A");
    assert_eq!(state.last_log_version(), 3);
    assert_eq!(state.last_log_guid(), "g1");

    let (mut state, effects) = update(state, Msg::SelectChat(ContextId::from("B")));
    assert!(effects.is_empty());
    assert_eq!(state.context().as_str(), "B");
    assert_eq!(state.last_log_version(), 0);
    assert_eq!(state.last_log_guid(), "");
    assert!(state.consume_dirty());
}

#[test]
fn selecting_the_active_context_keeps_log_tracking() {
    init_logging();
    let mut state = poll(AppState::new(), snapshot("A", "g1", 3, &["A"]));
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::SelectChat(ContextId::from("A")));
    assert_eq!(state.last_log_version(), 3);
    assert_eq!(state.last_log_guid(), "g1");
    assert!(!state.consume_dirty());
}

#[test]
fn every_switch_in_a_sequence_resets_exactly_when_the_id_changes() {
    init_logging();
    let mut state = AppState::new();
    for (target, expect_reset) in [("A", true), ("A", false), ("B", true), ("B", false)] {
        let current = state.context().to_string();
        state = poll(state, snapshot(&current, "g", 7, &["A", "B"]));
        assert_eq!(state.last_log_version(), 7);

        let (next, _) = update(state, Msg::SelectChat(ContextId::from(target)));
        state = next;
        if expect_reset {
            assert_eq!(state.last_log_version(), 0, "switch to {target}");
            assert_eq!(state.last_log_guid(), "");
        } else {
            assert_eq!(state.last_log_version(), 7, "reselect of {target}");
            assert_eq!(state.last_log_guid(), "g");
        }
    }
}

#[test]
fn new_chat_activates_a_fresh_id() {
    init_logging();
    let state = poll(AppState::new(), snapshot("A", "g1", 3, &["A"]));

    let (state, effects) = update(state, Msg::new_chat());
    assert!(effects.is_empty());
    assert_ne!(state.context().as_str(), "A");
    assert!(uuid_like(state.context().as_str()));
    assert_eq!(state.last_log_version(), 0);
}

#[test]
fn kill_active_chat_switches_to_the_other_one() {
    init_logging();
    let state = poll(AppState::new(), snapshot("A", "g1", 1, &["A", "B"]));

    let (state, effects) = update(state, Msg::kill_chat(ContextId::from("A")));

    assert_eq!(state.context().as_str(), "B");
    assert_eq!(
        effects,
        vec![Effect::RemoveContext {
            context: ContextId::from("A")
        }]
    );
}

#[test]
fn kill_only_chat_generates_a_new_one() {
    init_logging();
    let state = poll(AppState::new(), snapshot("A", "g1", 1, &["A"]));

    let seen = [state.context().clone()];
    let (state, effects) = update(state, Msg::kill_chat(ContextId::from("A")));

    assert!(!seen.contains(state.context()));
    assert!(!state.context().is_empty());
    assert!(uuid_like(state.context().as_str()));
    assert_eq!(
        effects,
        vec![Effect::RemoveContext {
            context: ContextId::from("A")
        }]
    );
}

#[test]
fn kill_inactive_chat_keeps_the_active_one() {
    init_logging();
    let state = poll(AppState::new(), snapshot("A", "g1", 1, &["A", "B", "C"]));

    let (state, effects) = update(state, Msg::kill_chat(ContextId::from("C")));

    assert_eq!(state.context().as_str(), "A");
    assert_eq!(state.last_log_version(), 1);
    assert_eq!(
        effects,
        vec![Effect::RemoveContext {
            context: ContextId::from("C")
        }]
    );
}

#[test]
fn kill_unknown_chat_does_nothing() {
    init_logging();
    let state = poll(AppState::new(), snapshot("A", "g1", 1, &["A"]));

    let (state, effects) = update(state, Msg::kill_chat(ContextId::from("Z")));

    assert_eq!(state.context().as_str(), "A");
    assert!(effects.is_empty());
}

#[test]
fn kill_picks_the_last_other_entry_seen_before_the_scan_stops() {
    init_logging();
    let state = poll(AppState::new(), snapshot("B", "g1", 1, &["A", "C", "B", "D"]));

    let (state, _) = update(state, Msg::kill_chat(ContextId::from("B")));

    assert_eq!(state.context().as_str(), "C");
}

#[test]
fn pause_and_reset_target_the_active_context() {
    init_logging();
    let state = poll(AppState::new(), snapshot("A", "g1", 1, &["A"]));

    let (state, effects) = update(state, Msg::PauseToggled);
    assert_eq!(
        effects,
        vec![Effect::Pause {
            paused: true,
            context: ContextId::from("A")
        }]
    );

    let (_, effects) = update(state, Msg::ResetRequested);
    assert_eq!(
        effects,
        vec![Effect::Reset {
            context: ContextId::from("A")
        }]
    );
}

#[test]
fn submitted_message_is_trimmed_and_input_cleared() {
    init_logging();
    let state = poll(AppState::new(), snapshot("A", "g1", 1, &["A"]));

    let (state, _) = update(state, Msg::InputChanged("  hello agent \n".to_string()));
    let (state, effects) = update(state, Msg::MessageSubmitted);

    assert_eq!(
        effects,
        vec![Effect::SendMessage {
            text: "hello agent".to_string(),
            context: ContextId::from("A"),
        }]
    );
    assert_eq!(state.input(), "");

    let (_, effects) = update(state, Msg::MessageSubmitted);
    assert!(effects.is_empty());
}

fn uuid_like(raw: &str) -> bool {
    let parts: Vec<_> = raw.split('-').map(str::len).collect();
    parts == vec![8, 4, 4, 4, 12] && raw.chars().nth(14) == Some('4')
}
