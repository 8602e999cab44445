//! Context window builder: picks which prior turns are resent upstream.
//!
//! Many chat APIs reject conversations that do not alternate
//! `user`/`assistant` or that do not start with `user`. The window is cut
//! from the tail of a group's history and trimmed so that it does.

use crate::types::{Message, Role};

/// Build the message list for a new user turn.
///
/// * `history`: the group's messages *before* the new one is appended
/// * `pairs`: window size in exchange pairs; at most `2 * pairs`
///   history messages are considered
/// * `new_message`: the text the user just typed
///
/// Steps: take the last `2 * pairs` messages, keep only the first message of
/// each run of same-role messages, drop the first element unless it is a
/// `user` message, drop the last element unless it is an `assistant`
/// message, then append the new user message.
///
/// The result always ends with `user(new_message)`.
pub fn build_context_window(history: &[Message], pairs: usize, new_message: &str) -> Vec<Message> {
    let take = pairs.saturating_mul(2).min(history.len());
    let recent = &history[history.len() - take..];

    let mut window: Vec<Message> = Vec::with_capacity(take + 1);
    for msg in recent {
        if window.last().map_or(true, |last| last.role != msg.role) {
            window.push(msg.clone());
        }
    }

    if window.first().is_some_and(|m| m.role != Role::User) {
        window.remove(0);
    }
    if window.last().is_some_and(|m| m.role != Role::Assistant) {
        window.pop();
    }

    window.push(Message::user(new_message));
    window
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(role: Role, content: &str) -> Message {
        Message::new(role, content)
    }

    fn roles(window: &[Message]) -> Vec<Role> {
        window.iter().map(|m| m.role).collect()
    }

    /// Every history of length `len` over the three roles.
    fn all_histories(len: usize) -> Vec<Vec<Message>> {
        const ROLES: [Role; 3] = [Role::User, Role::Assistant, Role::System];
        let mut out = vec![Vec::new()];
        for step in 0..len {
            out = out
                .into_iter()
                .flat_map(|prefix| {
                    ROLES.into_iter().map(move |role| {
                        let mut next = prefix.clone();
                        next.push(msg(role, &format!("m{step}")));
                        next
                    })
                })
                .collect();
        }
        out
    }

    #[test]
    fn test_empty_history() {
        let window = build_context_window(&[], 3, "hello");
        assert_eq!(window, vec![Message::user("hello")]);
    }

    #[test]
    fn test_zero_pairs_ignores_history() {
        let history = vec![msg(Role::User, "a"), msg(Role::Assistant, "b")];
        let window = build_context_window(&history, 0, "c");
        assert_eq!(window, vec![Message::user("c")]);
    }

    #[test]
    fn test_takes_last_two_per_pair() {
        let history = vec![
            msg(Role::User, "a"),
            msg(Role::User, "b"),
            msg(Role::Assistant, "c"),
        ];
        let window = build_context_window(&history, 1, "d");
        assert_eq!(
            window,
            vec![
                msg(Role::User, "b"),
                msg(Role::Assistant, "c"),
                msg(Role::User, "d"),
            ]
        );
    }

    #[test]
    fn test_collapses_runs_to_first_message() {
        let history = vec![
            msg(Role::User, "q1"),
            msg(Role::User, "q1 again"),
            msg(Role::Assistant, "a1"),
            msg(Role::Assistant, "a1 more"),
        ];
        let window = build_context_window(&history, 2, "q2");
        assert_eq!(
            window,
            vec![
                msg(Role::User, "q1"),
                msg(Role::Assistant, "a1"),
                msg(Role::User, "q2"),
            ]
        );
    }

    #[test]
    fn test_drops_leading_assistant() {
        let history = vec![
            msg(Role::User, "q1"),
            msg(Role::Assistant, "a1"),
            msg(Role::User, "q2"),
            msg(Role::Assistant, "a2"),
        ];
        let window = build_context_window(&history[1..], 2, "q3");
        assert_eq!(roles(&window), vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(window[0].content, "q2");
    }

    #[test]
    fn test_drops_trailing_user() {
        // A failed send leaves a dangling user turn.
        let history = vec![
            msg(Role::User, "q1"),
            msg(Role::Assistant, "a1"),
            msg(Role::User, "q2"),
        ];
        let window = build_context_window(&history, 5, "q3");
        assert_eq!(
            window,
            vec![
                msg(Role::User, "q1"),
                msg(Role::Assistant, "a1"),
                msg(Role::User, "q3"),
            ]
        );
    }

    #[test]
    fn test_single_assistant_message_degenerates() {
        let history = vec![msg(Role::Assistant, "orphan")];
        let window = build_context_window(&history, 1, "hi");
        assert_eq!(window, vec![Message::user("hi")]);
    }

    #[test]
    fn test_single_user_message_degenerates() {
        let history = vec![msg(Role::User, "only")];
        let window = build_context_window(&history, 1, "hi");
        assert_eq!(window, vec![Message::user("hi")]);
    }

    #[test]
    fn test_system_messages_pass_through_dedup() {
        let history = vec![
            msg(Role::User, "q1"),
            msg(Role::System, "Error: boom"),
            msg(Role::Assistant, "a1"),
        ];
        let window = build_context_window(&history, 2, "q2");
        assert_eq!(
            roles(&window),
            vec![Role::User, Role::System, Role::Assistant, Role::User]
        );
    }

    #[test]
    fn test_huge_pair_count_does_not_overflow() {
        let history = vec![msg(Role::User, "q"), msg(Role::Assistant, "a")];
        let window = build_context_window(&history, usize::MAX, "next");
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_always_ends_with_new_message() {
        for len in 0..=6 {
            for history in all_histories(len) {
                for pairs in 0..=4 {
                    let window = build_context_window(&history, pairs, "new");
                    assert_eq!(window.last(), Some(&Message::user("new")));
                    assert!(window.len() <= pairs * 2 + 1);
                }
            }
        }
    }

    #[test]
    fn test_no_adjacent_roles_repeat_before_new_message() {
        for len in 0..=6 {
            for history in all_histories(len) {
                for pairs in 0..=4 {
                    let window = build_context_window(&history, pairs, "new");
                    let prior = &window[..window.len() - 1];
                    for pair in prior.windows(2) {
                        assert_ne!(pair[0].role, pair[1].role, "history: {history:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_preserves_chronological_order() {
        let history: Vec<Message> = (0..8)
            .map(|i| {
                let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
                msg(role, &i.to_string())
            })
            .collect();
        let window = build_context_window(&history, 2, "8");
        let contents: Vec<&str> = window.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["4", "5", "6", "7", "8"]);
    }
}
