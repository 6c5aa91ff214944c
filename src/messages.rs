//! Typed forms of the messages exchanged with isolated rendering panes.
//!
//! The controller posts state one-directionally to each pane; panes report
//! user interaction back as a `visualizationEvent`. Delivery is at-most-once
//! with no ordering guarantee, so the protocol never relies on a pane having
//! seen earlier messages: a pane announces itself with the `ready` action and
//! the controller replies with a full snapshot of the current selection.

use crate::state::ViewKind;
use serde::{Deserialize, Serialize};

/// Controller -> pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControllerMessage {
    UpdateVisualization { view: ViewKind },
    UpdateCategory { category: String },
    UpdateYear { year: u16 },
    #[serde(rename_all = "camelCase")]
    UpdateSpendingChange { begin_year: u16, end_year: u16 },
}

/// Pane -> controller. The single `visualizationEvent` envelope carries an
/// action discriminant, matching the wire shape the panes emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PaneEvent {
    VisualizationEvent(PaneAction),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PaneAction {
    CategorySelected { category: String },
    YearSelected { year: u16 },
    ViewSelected { view: ViewKind },
    /// Handshake: the pane finished loading and can accept messages.
    Ready { pane: String },
}
