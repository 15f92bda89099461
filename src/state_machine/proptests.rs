//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible event
//! sequences.

use super::transition::*;
use super::*;
use crate::decoder::StreamUpdate;
use crate::transcript::{Transcript, Turn};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_source() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("doc1.pdf".to_string()),
        Just("a/b/report.pdf".to_string()),
        "[a-z]{1,8}/[a-z]{1,8}\\.pdf",
    ]
}

fn arb_update() -> impl Strategy<Value = StreamUpdate> {
    (
        "[a-zA-Z0-9 .,!?éü]{0,12}",
        proptest::collection::vec(arb_source(), 0..3),
    )
        .prop_map(|(text, sources)| StreamUpdate::new(text, sources))
}

fn arb_user_message() -> impl Strategy<Value = Event> {
    "[a-zA-Z ?]{1,20}".prop_map(|text| Event::UserMessage { text })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => arb_update().prop_map(Event::Update),
        1 => arb_user_message(),
    ]
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![Just(ConvState::Idle), Just(ConvState::Accumulating)]
}

fn run(events: impl IntoIterator<Item = Event>) -> StreamAccumulator {
    let mut acc = StreamAccumulator::new();
    for event in events {
        acc.apply(event);
    }
    acc
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Without user turns in between, a reply is the concatenation of
    /// every fragment and every source batch, in arrival order.
    #[test]
    fn prop_reply_is_concatenation(updates in proptest::collection::vec(arb_update(), 1..20)) {
        let expected_text: String = updates.iter().map(|u| u.text_fragment.as_str()).collect();
        let expected_sources: Vec<String> =
            updates.iter().flat_map(|u| u.new_sources.iter().cloned()).collect();

        let acc = run(updates.into_iter().map(Event::Update));

        prop_assert_eq!(acc.state(), ConvState::Accumulating);
        prop_assert_eq!(acc.transcript().len(), 1);
        let turn = acc.transcript().last().unwrap();
        prop_assert!(!turn.is_user());
        prop_assert_eq!(turn.text(), expected_text.as_str());
        prop_assert_eq!(turn.sources(), expected_sources.as_slice());
    }

    /// Each user message adds exactly one user turn, and the next update
    /// always opens a new assistant turn.
    #[test]
    fn prop_user_message_starts_new_reply(
        events in proptest::collection::vec(arb_event(), 0..30),
        question in "[a-z ]{1,10}",
        next in arb_update(),
    ) {
        let mut acc = run(events);
        let before = acc.transcript().len();

        acc.apply(Event::UserMessage { text: question.clone() });
        prop_assert_eq!(acc.state(), ConvState::Idle);
        prop_assert_eq!(acc.transcript().len(), before + 1);
        prop_assert_eq!(acc.transcript().last(), Some(&Turn::user(question)));

        acc.apply(Event::Update(next.clone()));
        prop_assert_eq!(acc.state(), ConvState::Accumulating);
        prop_assert_eq!(acc.transcript().len(), before + 2);
        prop_assert_eq!(
            acc.transcript().last(),
            Some(&Turn::assistant(next.text_fragment, next.new_sources))
        );
    }

    /// Turns are never reordered: every transition leaves all but the last
    /// turn of the previous transcript untouched, and user turns never change.
    #[test]
    fn prop_history_is_stable(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut acc = StreamAccumulator::new();
        for event in events {
            let before = acc.snapshot();
            acc.apply(event);
            let after = acc.transcript();

            prop_assert!(after.len() >= before.transcript.len());
            let stable = before.transcript.len().saturating_sub(1);
            prop_assert_eq!(&after.turns()[..stable], &before.transcript.turns()[..stable]);
            for (old, new) in before.transcript.turns()[..stable].iter().zip(after.turns()) {
                prop_assert!(Arc::ptr_eq(old, new));
            }
            if let Some(last) = before.transcript.last() {
                let same_slot = &after.turns()[before.transcript.len() - 1];
                if last.is_user() {
                    prop_assert_eq!(same_slot, last);
                } else {
                    prop_assert!(same_slot.text().starts_with(last.text()));
                    prop_assert!(same_slot.sources().starts_with(last.sources()));
                }
            }
        }
    }

    /// User turns carry no sources, whatever the sequence
    #[test]
    fn prop_user_turns_have_no_sources(events in proptest::collection::vec(arb_event(), 0..40)) {
        let acc = run(events);
        for turn in acc.transcript().turns().iter().filter(|t| t.is_user()) {
            prop_assert!(turn.sources().is_empty());
        }
    }

    /// Number of turns = user messages + runs of updates following them
    #[test]
    fn prop_turn_count(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut expected = 0usize;
        let mut in_reply = false;
        for event in &events {
            match event {
                Event::UserMessage { .. } => {
                    expected += 1;
                    in_reply = false;
                }
                Event::Update(_) if !in_reply => {
                    expected += 1;
                    in_reply = true;
                }
                Event::Update(_) | Event::Reset => {}
            }
        }

        prop_assert_eq!(run(events).transcript().len(), expected);
    }

    /// Empty updates never change the content of a reply in progress
    #[test]
    fn prop_empty_update_is_noop(
        events in proptest::collection::vec(arb_event(), 0..20),
        first in arb_update(),
        repeats in 1usize..5,
    ) {
        let mut acc = run(events);
        acc.apply(Event::Update(first));
        let before = acc.snapshot();

        for _ in 0..repeats {
            acc.apply(Event::Update(StreamUpdate::default()));
        }

        prop_assert_eq!(acc.snapshot(), before);
    }

    /// Transition is deterministic and total for any state and event
    #[test]
    fn prop_transition_is_deterministic(
        state in arb_state(),
        prefix in proptest::collection::vec(arb_event(), 0..10),
        event in arb_event(),
    ) {
        let transcript = run(prefix).transcript().clone();
        let a = transition(state, transcript.clone(), event.clone());
        let b = transition(state, transcript, event);

        prop_assert_eq!(a.new_state, b.new_state);
        prop_assert_eq!(a.transcript, b.transcript);
    }

    /// Reset always yields an empty, idle conversation
    #[test]
    fn prop_reset_clears(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut acc = run(events);
        acc.apply(Event::Reset);

        prop_assert_eq!(acc.state(), ConvState::Idle);
        prop_assert_eq!(acc.transcript(), &Transcript::new());
    }
}
