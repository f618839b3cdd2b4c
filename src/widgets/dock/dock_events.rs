//! Timeline dock toolbar events.

use super::dock::DockMode;

/// Primary (render/play/pause/resume) button pressed.
#[derive(Clone, Debug)]
pub struct PrimaryControlPressedEvent;

#[derive(Clone, Debug)]
pub struct StopControlPressedEvent;

#[derive(Clone, Debug)]
pub struct ResolutionTextChangedEvent(pub String);

#[derive(Clone, Debug)]
pub struct DockModeSelectedEvent(pub DockMode);

#[derive(Clone, Debug)]
pub struct LocalPivotToggledEvent(pub bool);
