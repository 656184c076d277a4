//! Event types for streaming editor changes
//!
//! Events are an alternative to closure subscriptions for hosts that
//! forward state to a frontend over a channel (webview bridge, IPC, mpsc).
//! The store emits at most one event per kind for each committed update.

use serde::{Deserialize, Serialize};

use crate::types::{NodeId, NodeRef};

/// Trait for receiving editor events
///
/// This abstracts over the transport mechanism so the store does not need
/// to know how events reach the frontend.
pub trait EventSink {
    /// Send an event
    ///
    /// Returns an error if the event could not be sent (e.g., channel closed)
    fn send(&self, event: EditorEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

/// Events emitted after a store update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// The workflow tree changed
    #[serde(rename_all = "camelCase")]
    StartNodeChanged { start_node: Option<NodeRef> },

    /// The selection changed
    #[serde(rename_all = "camelCase")]
    SelectionChanged { selected_id: Option<NodeId> },

    /// The undo or redo list changed
    #[serde(rename_all = "camelCase")]
    HistoryChanged {
        undo_depth: usize,
        redo_depth: usize,
    },
}

/// A no-op event sink that discards all events
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: EditorEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<EditorEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: EditorEvent) -> Result<(), EventError> {
        self.events
            .lock()
            .map_err(|_| EventError {
                message: "Event buffer poisoned".to_string(),
            })?
            .push(event);
        Ok(())
    }
}

/// Shared sinks forward to the sink they wrap
impl<S: EventSink + ?Sized> EventSink for std::sync::Arc<S> {
    fn send(&self, event: EditorEvent) -> Result<(), EventError> {
        (**self).send(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_event_sink() {
        let sink = VecEventSink::new();

        sink.send(EditorEvent::SelectionChanged {
            selected_id: Some("a1".to_string()),
        })
        .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);

        match &events[0] {
            EditorEvent::SelectionChanged { selected_id } => {
                assert_eq!(selected_id.as_deref(), Some("a1"));
            }
            _ => panic!("Expected SelectionChanged event"),
        }

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_null_event_sink() {
        let sink = NullEventSink;
        // Should not panic
        sink.send(EditorEvent::HistoryChanged {
            undo_depth: 1,
            redo_depth: 0,
        })
        .unwrap();
    }

    #[test]
    fn test_event_serialization() {
        let event = EditorEvent::HistoryChanged {
            undo_depth: 2,
            redo_depth: 1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "historyChanged");
        assert_eq!(json["undoDepth"], 2);
        assert_eq!(json["redoDepth"], 1);
    }
}
