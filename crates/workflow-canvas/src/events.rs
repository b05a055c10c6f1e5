//! Editor notifications
//!
//! The interaction controller queues these as it handles input so the
//! presentation layer can react (repaint, open a panel, play a snap
//! animation) without diffing snapshots itself.

use serde::{Deserialize, Serialize};

use crate::types::{EdgeId, NodeId, Panel};

/// Events emitted while handling editor input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// A new graph snapshot replaced the previous one
    GraphChanged,

    /// The selected node changed
    #[serde(rename_all = "camelCase")]
    SelectionChanged { node_id: Option<NodeId> },

    /// The side panel changed
    #[serde(rename_all = "camelCase")]
    PanelChanged { panel: Panel },

    /// A connection drag started from a node's anchor
    #[serde(rename_all = "camelCase")]
    ConnectionStarted { node_id: NodeId },

    /// A connection drag ended over a node and produced an edge
    #[serde(rename_all = "camelCase")]
    ConnectionCommitted {
        source_id: NodeId,
        target_id: NodeId,
    },

    /// A connection drag ended without a target or was cancelled
    #[serde(rename_all = "camelCase")]
    ConnectionDiscarded { node_id: NodeId },

    /// A node drag finished
    #[serde(rename_all = "camelCase")]
    DragCommitted { node_id: NodeId },

    /// A node drag was cancelled
    #[serde(rename_all = "camelCase")]
    DragCancelled { node_id: NodeId },

    /// An edge was removed through its context action
    #[serde(rename_all = "camelCase")]
    EdgeRemoved { edge_id: EdgeId },
}

impl EditorEvent {
    /// Create a selection event
    pub fn selection(node_id: Option<&str>) -> Self {
        Self::SelectionChanged {
            node_id: node_id.map(str::to_string),
        }
    }
}

/// FIFO of pending events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<EditorEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: EditorEvent) {
        log::trace!("Queued {:?}", event);
        self.events.push(event);
    }

    /// Take every queued event in emission order
    pub fn drain(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = EventQueue::new();
        queue.push(EditorEvent::GraphChanged);
        queue.push(EditorEvent::selection(Some("node-0")));

        let events = queue.drain();
        assert_eq!(events.len(), 2);
        assert!(queue.is_empty());

        match &events[1] {
            EditorEvent::SelectionChanged { node_id } => {
                assert_eq!(node_id.as_deref(), Some("node-0"));
            }
            _ => panic!("Expected SelectionChanged event"),
        }
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let json = serde_json::to_value(EditorEvent::ConnectionCommitted {
            source_id: "a".to_string(),
            target_id: "b".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "connectionCommitted");
        assert_eq!(json["sourceId"], "a");
    }
}
