use super::model::StudioState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioEvent {
    OpenEditor,
    SaveEdit,
    CancelEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<StudioState>,
    pub event: StudioEvent,
    pub to: StudioState,
}

impl StateTransition {
    pub const fn new(from: Option<StudioState>, event: StudioEvent, to: StudioState) -> Self {
        Self { from, event, to }
    }
}
