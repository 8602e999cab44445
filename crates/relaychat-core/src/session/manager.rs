//! Chat session: named groups, the current group, and snapshot persistence.
//!
//! Snapshot format: one JSON object mapping group name to an array of
//! `{"role": ..., "content": ...}` messages, e.g.
//! `{"default":[{"role":"user","content":"hello"}]}`.
//! The same format is used for export and import files.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::ChatError;
use crate::session::store::SnapshotStore;
use crate::types::{Groups, Message, Role};
use crate::utils;

/// Name of the group that exists after a reset or on first start.
pub const DEFAULT_GROUP: &str = "default";

// ─────────────────────────────────────────────
// ChatSession
// ─────────────────────────────────────────────

/// In-memory session state plus the durable slot it is mirrored to.
///
/// Exactly one group is current at any time and it always exists in
/// `groups`. Every mutation rewrites the snapshot.
pub struct ChatSession {
    groups: Groups,
    current: String,
    store: Box<dyn SnapshotStore>,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("groups", &self.groups.len())
            .field("current", &self.current)
            .finish()
    }
}

impl ChatSession {
    /// Open a session from whatever `store` holds.
    ///
    /// A missing, unreadable, or invalid snapshot starts a fresh session with
    /// a single empty `default` group. The current group is the first one.
    pub fn open(store: impl SnapshotStore + 'static) -> Self {
        let groups = match store.load() {
            Ok(Some(raw)) => match parse_snapshot(&raw) {
                Ok(groups) => {
                    info!(groups = groups.len(), "chat history loaded");
                    groups
                }
                Err(e) => {
                    warn!(error = %e, "stored snapshot is invalid, starting fresh");
                    default_groups()
                }
            },
            Ok(None) => {
                info!("no saved chat history found");
                default_groups()
            }
            Err(e) => {
                warn!(error = %e, "failed to read snapshot, starting fresh");
                default_groups()
            }
        };

        let mut session = Self {
            groups,
            current: String::new(),
            store: Box::new(store),
        };
        session.ensure_current();
        session
    }

    /// Drop the session. Every mutation has already been saved, so this
    /// never writes: an erased snapshot stays erased and a snapshot that
    /// failed to load is left as it was.
    pub fn close(self) {
        debug!(groups = self.groups.len(), "chat session closed");
    }

    // ── Queries ──

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn current_group(&self) -> &str {
        &self.current
    }

    /// Messages of the current group, oldest first.
    pub fn current_messages(&self) -> &[Message] {
        self.groups
            .get(&self.current)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // ── Mutations ──

    /// Create an empty group and make it current.
    ///
    /// Returns `false` (and changes nothing) if the trimmed name is empty or
    /// already taken.
    pub fn create_group(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.groups.contains_key(name) {
            return false;
        }
        self.groups.insert(name.to_string(), Vec::new());
        self.current = name.to_string();
        debug!(group = name, "group created");
        self.persist();
        true
    }

    /// Make `name` the current group. Unknown names are ignored.
    pub fn switch_group(&mut self, name: &str) -> bool {
        if !self.groups.contains_key(name) {
            debug!(group = name, "switch to unknown group ignored");
            return false;
        }
        self.current = name.to_string();
        true
    }

    /// Append a message to the current group and persist.
    pub fn append_message(&mut self, role: Role, content: impl Into<String>) -> &Message {
        self.ensure_current();
        let messages = self.groups.entry(self.current.clone()).or_default();
        messages.push(Message::new(role, content));
        self.persist();

        let messages = &self.groups[&self.current];
        &messages[messages.len() - 1]
    }

    /// Reset to a single empty `default` group and erase the snapshot.
    ///
    /// Irreversible; callers confirm with the user first.
    pub fn clear_all(&mut self) {
        self.groups = default_groups();
        self.current = DEFAULT_GROUP.to_string();
        if let Err(e) = self.store.erase() {
            warn!(error = %e, "failed to erase snapshot");
        }
        info!("chat history cleared");
    }

    // ── Import / export ──

    /// Serialize every group as pretty JSON. Does not touch state.
    pub fn export_snapshot(&self) -> String {
        serde_json::to_string_pretty(&self.groups).unwrap_or_else(|_| "{}".to_string())
    }

    /// Write an export file named after today's date into `dir`.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, ChatError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(utils::export_file_name(&utils::today_date()));
        std::fs::write(&path, self.export_snapshot())?;
        info!(path = %path.display(), "chat history exported");
        Ok(path)
    }

    /// Replace all state with `raw` and persist it.
    ///
    /// Fails with [`ChatError::MalformedImport`] unless `raw` is a JSON object
    /// with at least one group; state is untouched on failure. Returns the
    /// number of imported groups.
    pub fn import_snapshot(&mut self, raw: &str) -> Result<usize, ChatError> {
        let groups = parse_snapshot(raw)?;
        let count = groups.len();
        self.groups = groups;
        self.current.clear();
        self.ensure_current();
        self.persist();
        info!(groups = count, "chat history imported");
        Ok(count)
    }

    /// Read `path` and import it.
    pub fn import_file(&mut self, path: &Path) -> Result<usize, ChatError> {
        let raw = std::fs::read_to_string(path)?;
        self.import_snapshot(&raw)
    }

    // ── Internals ──

    /// Restore the invariant that `current` names an existing group.
    fn ensure_current(&mut self) {
        if self.groups.contains_key(&self.current) {
            return;
        }
        match self.groups.keys().next() {
            Some(first) => self.current = first.clone(),
            None => {
                self.groups.insert(DEFAULT_GROUP.to_string(), Vec::new());
                self.current = DEFAULT_GROUP.to_string();
            }
        }
    }

    fn persist(&self) {
        let snapshot = match serde_json::to_string(&self.groups) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to serialize snapshot");
                return;
            }
        };
        if let Err(e) = self.store.save(&snapshot) {
            warn!(error = %e, "failed to persist snapshot");
        }
    }
}

/// Parse and validate a snapshot / import document.
pub fn parse_snapshot(raw: &str) -> Result<Groups, ChatError> {
    let groups: Groups =
        serde_json::from_str(raw).map_err(|e| ChatError::MalformedImport(e.to_string()))?;
    if groups.is_empty() {
        return Err(ChatError::MalformedImport("no chat groups found".to_string()));
    }
    Ok(groups)
}

fn default_groups() -> Groups {
    let mut groups = Groups::new();
    groups.insert(DEFAULT_GROUP.to_string(), Vec::new());
    groups
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::{FileSnapshotStore, MemorySnapshotStore};
    use crate::window::build_context_window;
    use tempfile::tempdir;

    fn make_session() -> (ChatSession, MemorySnapshotStore) {
        let store = MemorySnapshotStore::new();
        (ChatSession::open(store.clone()), store)
    }

    fn stored_groups(store: &MemorySnapshotStore) -> Groups {
        serde_json::from_str(&store.contents().unwrap()).unwrap()
    }

    #[test]
    fn test_fresh_session_has_default_group() {
        let (session, store) = make_session();
        assert_eq!(session.current_group(), DEFAULT_GROUP);
        assert!(session.current_messages().is_empty());
        assert_eq!(session.group_names().collect::<Vec<_>>(), vec!["default"]);
        // Nothing written until something changes.
        assert!(store.contents().is_none());
    }

    #[test]
    fn test_open_restores_groups_and_picks_first() {
        let store = MemorySnapshotStore::with_snapshot(
            r#"{"work":[{"role":"user","content":"hi"}],"play":[]}"#,
        );
        let session = ChatSession::open(store);
        assert_eq!(session.current_group(), "work");
        assert_eq!(session.current_messages(), &[Message::user("hi")]);
        assert_eq!(session.group_names().collect::<Vec<_>>(), vec!["work", "play"]);
    }

    #[test]
    fn test_open_with_invalid_snapshot_starts_fresh() {
        for raw in ["not json", "{}", "[]", "null"] {
            let session = ChatSession::open(MemorySnapshotStore::with_snapshot(raw));
            assert_eq!(session.current_group(), DEFAULT_GROUP);
            assert_eq!(session.groups().len(), 1);
        }
    }

    #[test]
    fn test_create_group_switches_and_persists() {
        let (mut session, store) = make_session();
        assert!(session.create_group("work"));
        assert_eq!(session.current_group(), "work");

        let saved = stored_groups(&store);
        assert!(saved.contains_key("work"));
        assert!(saved.contains_key("default"));
    }

    #[test]
    fn test_create_group_rejects_empty_and_duplicate() {
        let (mut session, store) = make_session();
        assert!(!session.create_group(""));
        assert!(!session.create_group("   "));
        assert!(!session.create_group("default"));
        assert_eq!(session.groups().len(), 1);
        assert!(store.contents().is_none());
    }

    #[test]
    fn test_create_group_trims_name() {
        let (mut session, _store) = make_session();
        assert!(session.create_group("  notes "));
        assert_eq!(session.current_group(), "notes");
    }

    #[test]
    fn test_switch_group_unknown_is_noop() {
        let (mut session, _store) = make_session();
        session.create_group("work");
        assert!(!session.switch_group("nope"));
        assert_eq!(session.current_group(), "work");
        assert!(session.switch_group("default"));
        assert_eq!(session.current_group(), "default");
    }

    #[test]
    fn test_append_goes_to_current_group() {
        let (mut session, store) = make_session();
        session.append_message(Role::User, "in default");
        session.create_group("work");
        let appended = session.append_message(Role::User, "in work").clone();
        assert_eq!(appended, Message::user("in work"));

        assert_eq!(session.groups()["default"], vec![Message::user("in default")]);
        assert_eq!(session.groups()["work"], vec![Message::user("in work")]);
        assert_eq!(stored_groups(&store)["work"].len(), 1);
    }

    #[test]
    fn test_clear_all_resets_and_erases() {
        let (mut session, store) = make_session();
        session.create_group("work");
        session.append_message(Role::User, "hello");
        assert!(store.contents().is_some());

        session.clear_all();
        assert_eq!(session.current_group(), DEFAULT_GROUP);
        assert_eq!(session.groups().len(), 1);
        assert!(session.current_messages().is_empty());
        assert!(store.contents().is_none());
    }

    #[test]
    fn test_close_without_changes_writes_nothing() {
        let (session, store) = make_session();
        session.close();
        assert!(store.contents().is_none());
    }

    #[test]
    fn test_clear_stays_cleared_after_close() {
        let (mut session, store) = make_session();
        session.create_group("work");
        session.append_message(Role::User, "hello");
        session.clear_all();
        session.close();
        assert!(store.contents().is_none());
    }

    #[test]
    fn test_corrupt_snapshot_survives_read_only_session() {
        let store = MemorySnapshotStore::with_snapshot("{not json");
        let session = ChatSession::open(store.clone());
        assert_eq!(session.current_group(), DEFAULT_GROUP);
        session.close();
        assert_eq!(store.contents().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_export_does_not_mutate() {
        let (mut session, store) = make_session();
        session.append_message(Role::User, "hello");
        let before = store.contents();
        let exported = session.export_snapshot();
        assert!(exported.contains("\"hello\""));
        assert_eq!(store.contents(), before);
        assert_eq!(session.current_messages().len(), 1);
    }

    #[test]
    fn test_export_import_round_trip() {
        let (mut session, _store) = make_session();
        session.append_message(Role::User, "q");
        session.append_message(Role::Assistant, "a");
        session.create_group("work");
        session.append_message(Role::System, "Error: boom");
        let exported = session.export_snapshot();
        let original = session.groups().clone();

        let (mut other, other_store) = make_session();
        assert_eq!(other.import_snapshot(&exported).unwrap(), 2);
        assert_eq!(other.groups(), &original);
        assert_eq!(other.current_group(), "default");
        assert_eq!(stored_groups(&other_store), original);
    }

    #[test]
    fn test_import_rejects_malformed() {
        let (mut session, store) = make_session();
        session.append_message(Role::User, "keep me");
        let before = store.contents();

        for raw in ["[]", "null", "{}", "not json at all", r#"{"g":[{"role":"robot","content":"x"}]}"#] {
            let err = session.import_snapshot(raw).unwrap_err();
            assert!(matches!(err, ChatError::MalformedImport(_)), "{raw}: {err}");
        }

        assert_eq!(session.current_messages(), &[Message::user("keep me")]);
        assert_eq!(store.contents(), before);
    }

    #[test]
    fn test_import_replaces_current_group() {
        let (mut session, _store) = make_session();
        session.create_group("old");
        session
            .import_snapshot(r#"{"fresh":[{"role":"assistant","content":"hi"}]}"#)
            .unwrap();
        assert_eq!(session.current_group(), "fresh");
        assert!(!session.groups().contains_key("old"));
    }

    #[test]
    fn test_export_to_dir_names_file_by_date() {
        let dir = tempdir().unwrap();
        let (mut session, _store) = make_session();
        session.append_message(Role::User, "hello");

        let path = session.export_to_dir(dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, utils::export_file_name(&utils::today_date()));

        let (mut other, _) = make_session();
        other.import_file(&path).unwrap();
        assert_eq!(other.groups(), session.groups());
    }

    #[test]
    fn test_file_store_survives_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat_groups.json");

        {
            let mut session = ChatSession::open(FileSnapshotStore::new(&path));
            session.create_group("work");
            session.append_message(Role::User, "hello");
            session.append_message(Role::Assistant, "hi there");
            session.close();
        }

        let session = ChatSession::open(FileSnapshotStore::new(&path));
        assert_eq!(session.group_names().collect::<Vec<_>>(), vec!["default", "work"]);
        assert_eq!(session.groups()["work"].len(), 2);
    }

    #[test]
    fn test_work_group_first_message_window() {
        let (mut session, _store) = make_session();
        session.create_group("work");
        assert!(session.switch_group("work"));

        let window = build_context_window(session.current_messages(), 3, "hello");
        assert_eq!(window, vec![Message::user("hello")]);
    }
}
