//! Chat groups and their persisted snapshot.
//!
//! # Disk format
//!
//! The whole session lives in one JSON file (`~/.relaychat/chat_groups.json`
//! by default) mapping group name to its messages in display order.

pub mod manager;
pub mod store;

pub use manager::{parse_snapshot, ChatSession, DEFAULT_GROUP};
pub use store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
