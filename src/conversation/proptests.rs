//! Property-based tests for the conversation state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::message::{Reply, Role, Turn, GENERATION_FAILED_TEXT};
use super::transition::{transition, TransitionError};
use super::{ConversationState, Effect, Event};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant)]
}

fn arb_turn() -> impl Strategy<Value = Turn> {
    (
        arb_role(),
        "[a-zA-Z ]{0,10}[a-zA-Z]",
        proptest::option::of("https://img/[a-z]{1,8}\\.png"),
    )
        .prop_map(|(role, text, image_url)| Turn {
            role,
            text,
            image_url,
        })
}

/// Stored turn whose text may be blank
fn arb_stored_turn() -> impl Strategy<Value = Turn> {
    (arb_role(), "[a-z ]{0,6}").prop_map(|(role, text)| Turn {
        role,
        text,
        image_url: None,
    })
}

fn arb_blank_prompt() -> impl Strategy<Value = String> {
    "[ \t\n]{0,5}"
}

fn arb_prompt() -> impl Strategy<Value = String> {
    "[ ]{0,3}[a-z]{1,12}( [a-z]{1,8}){0,4}[ ]{0,3}"
}

fn arb_reply() -> impl Strategy<Value = Reply> {
    (
        "[A-Za-z!. ]{0,20}",
        proptest::option::of("https://example/[a-z]{1,8}\\.png"),
    )
        .prop_map(|(text, image_url)| Reply { text, image_url })
}

/// Something that can happen to a bootstrapped conversation
#[derive(Debug, Clone)]
enum Step {
    Submit(String),
    Succeed(Reply),
    Fail(String),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        arb_prompt().prop_map(Step::Submit),
        arb_blank_prompt().prop_map(Step::Submit),
        arb_reply().prop_map(Step::Succeed),
        "[a-z ]{1,20}".prop_map(Step::Fail),
    ]
}

fn step_event(step: Step) -> Event {
    match step {
        Step::Submit(text) => Event::PromptSubmitted { text },
        Step::Succeed(reply) => Event::GenerationSucceeded { reply },
        Step::Fail(reason) => Event::GenerationFailed { reason },
    }
}

fn bootstrapped(turns: Vec<Turn>) -> ConversationState {
    transition(&ConversationState::new(), Event::HistoryLoaded { turns })
        .unwrap()
        .new_state
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Bootstrap always leaves a non-empty history and never sets pending
    #[test]
    fn bootstrap_never_leaves_history_empty(
        turns in proptest::collection::vec(prop_oneof![arb_turn(), arb_stored_turn()], 0..6),
        fail in any::<bool>(),
    ) {
        let has_blank = turns.iter().any(|t| t.text.trim().is_empty());
        let event = if fail {
            Event::HistoryUnavailable { reason: "down".to_string() }
        } else {
            Event::HistoryLoaded { turns: turns.clone() }
        };
        let state = transition(&ConversationState::new(), event).unwrap().new_state;

        prop_assert!(!state.history.is_empty());
        prop_assert!(!state.pending);
        prop_assert!(state.bootstrapped);
        prop_assert!(state.history.iter().all(|m| !m.text.trim().is_empty()));
        if fail || turns.is_empty() || has_blank {
            prop_assert_eq!(state.history.len(), 1);
            prop_assert_eq!(state.history[0].role, Role::Assistant);
            prop_assert_eq!(&state.history[0].image_url, &None);
        } else {
            prop_assert_eq!(state.history.len(), turns.len());
        }
    }

    /// A rejected event never changes the state
    #[test]
    fn rejected_events_leave_state_untouched(
        turns in proptest::collection::vec(arb_turn(), 0..4),
        steps in proptest::collection::vec(arb_step(), 0..30),
    ) {
        let mut state = bootstrapped(turns);
        for step in steps {
            let before = state.clone();
            match transition(&state, step_event(step)) {
                Ok(result) => state = result.new_state,
                Err(_) => prop_assert_eq!(&state, &before),
            }
        }
    }

    /// Each applied event appends exactly one message, pending flips on every
    /// accepted prompt and off on every outcome, and ids only grow
    #[test]
    fn history_grows_one_message_per_applied_event(
        turns in proptest::collection::vec(arb_turn(), 0..4),
        steps in proptest::collection::vec(arb_step(), 0..40),
    ) {
        let mut state = bootstrapped(turns);
        for step in steps {
            let was_pending = state.pending;
            let is_submit = matches!(step, Step::Submit(_));
            let before_len = state.history.len();

            match transition(&state, step_event(step)) {
                Ok(result) => {
                    prop_assert_eq!(result.new_state.history.len(), before_len + 1);
                    if is_submit {
                        prop_assert!(!was_pending);
                        prop_assert!(result.new_state.pending);
                        let user = result.new_state.history.last().unwrap();
                        prop_assert_eq!(user.role, Role::User);
                        prop_assert_eq!(user.text.trim(), user.text.as_str());
                        prop_assert!(!user.text.is_empty());
                        let requested = matches!(
                            result.effects.as_slice(),
                            [Effect::RequestGeneration { prompt }] if prompt == &user.text
                        );
                        prop_assert!(requested);
                    } else {
                        prop_assert!(was_pending);
                        prop_assert!(!result.new_state.pending);
                        let reply = result.new_state.history.last().unwrap();
                        prop_assert_eq!(reply.role, Role::Assistant);
                        prop_assert!(!reply.text.trim().is_empty());
                    }
                    state = result.new_state;
                }
                Err(TransitionError::RequestPending) => prop_assert!(was_pending),
                Err(TransitionError::NoRequestPending) => prop_assert!(!was_pending),
                Err(TransitionError::EmptyPrompt) => prop_assert!(is_submit),
                Err(other) => prop_assert!(false, "unexpected rejection: {}", other),
            }

            let ids: Vec<_> = state.history.iter().map(|m| m.id).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }

    /// Serialized submissions (each resolved before the next) add exactly two
    /// messages, and every user prompt is answered exactly once
    #[test]
    fn serialized_submissions_add_two_messages_each(
        exchanges in proptest::collection::vec(
            (arb_prompt(), proptest::option::of(arb_reply())),
            1..10,
        ),
    ) {
        let mut state = bootstrapped(vec![]);
        let start_len = state.history.len();

        for (i, (prompt, outcome)) in exchanges.iter().enumerate() {
            state = transition(&state, Event::PromptSubmitted { text: prompt.clone() })
                .unwrap()
                .new_state;
            let event = match outcome {
                Some(reply) => Event::GenerationSucceeded { reply: reply.clone() },
                None => Event::GenerationFailed { reason: "offline".to_string() },
            };
            state = transition(&state, event).unwrap().new_state;

            prop_assert_eq!(state.history.len(), start_len + 2 * (i + 1));
            prop_assert!(!state.pending);

            let answer = state.history.last().unwrap();
            if outcome.is_none() {
                prop_assert_eq!(answer.text.as_str(), GENERATION_FAILED_TEXT);
                prop_assert_eq!(&answer.image_url, &None);
            }
        }

        let after_welcome = &state.history[start_len..];
        for pair in after_welcome.chunks(2) {
            prop_assert_eq!(pair[0].role, Role::User);
            prop_assert_eq!(pair[1].role, Role::Assistant);
        }
    }
}
