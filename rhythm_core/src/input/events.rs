use crate::chart::LaneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub lane: LaneId,
    pub pressed: bool,
}

impl InputEvent {
    pub fn press(lane: LaneId) -> Self {
        Self { lane, pressed: true }
    }

    pub fn release(lane: LaneId) -> Self {
        Self { lane, pressed: false }
    }
}
