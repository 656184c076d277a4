//! Workflow Editor - headless state engine for Flowpad approval flows
//!
//! This crate holds everything a visual approval-flow editor needs apart
//! from rendering:
//!
//! - A tree of workflow nodes (start, approver, notifier, audit, route and
//!   condition nodes) with structurally shared, immutable subtrees
//! - A pure reducer over [`EditorAction`]s
//! - Bounded, snapshot-based undo/redo
//! - Per-field change subscriptions and an [`EventSink`] for hosts
//! - Localized defaults for generated node names
//! - A [`MaterialRegistry`] of placeable node kinds
//!
//! # Architecture
//!
//! Every public operation on [`EditorStore`] plans a list of actions,
//! reduces them into a draft state, and commits the draft in one step.
//! Listeners therefore observe each operation exactly once, and a failed
//! operation leaves the state untouched.
//!
//! # Example
//!
//! ```
//! use workflow_editor::{EditorStore, WorkflowBuilder, WorkflowNode};
//!
//! let tree = WorkflowBuilder::new("start")
//!     .then_route(
//!         "route",
//!         vec![WorkflowNode::condition("c1"), WorkflowNode::condition("c2")],
//!     )
//!     .build();
//!
//! let mut store = EditorStore::builder().start_node(tree).build().unwrap();
//! store.add_node("start", WorkflowNode::approver("a1")).unwrap();
//! assert!(store.can_undo());
//!
//! store.undo();
//! assert!(store.find_node("a1").is_none());
//! ```

pub mod action;
pub mod builder;
pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod locale;
pub mod material;
pub mod state;
pub mod store;
pub mod subscribe;
pub mod tree;
pub mod types;
pub mod validation;

// Re-export key types
pub use action::{reduce, EditorAction};
pub use builder::WorkflowBuilder;
pub use command::EditorCommand;
pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use events::{EditorEvent, EventError, EventSink, NullEventSink, VecEventSink};
pub use history::HistoryPolicy;
pub use locale::{LocaleBundle, Locales};
pub use material::{MaterialDescriptor, MaterialFn, MaterialRegistry, NodeMaterial};
pub use state::{EditorState, Snapshot, SnapshotList};
pub use store::{EditorStore, EditorStoreBuilder};
pub use subscribe::{SubscriptionId, Subscriptions};
pub use types::{NodeId, NodeKind, NodeRef, NodeType, WorkflowNode};
pub use validation::{validate_workflow, ValidationError};

// Used by `inventory::submit!` in material crates
pub use inventory;
