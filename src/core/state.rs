use crate::shared::constants;

/// Where the cropping session is. The video is paused exactly while a
/// region is being selected or a crop is awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Playing,
    Selecting,
    Previewing,
    Finished,
}

impl SessionState {
    pub fn is_paused(self) -> bool {
        matches!(self, SessionState::Selecting | SessionState::Previewing)
    }

    pub fn is_finished(self) -> bool {
        self == SessionState::Finished
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Space: start a selection, or confirm the previewed crop.
    Select,
    /// Esc: drop the previewed crop.
    Cancel,
    SeekBack,
    SeekForward,
    Quit,
}

impl KeyCommand {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            constants::KEY_SPACE => Some(KeyCommand::Select),
            constants::KEY_ESC => Some(KeyCommand::Cancel),
            constants::KEY_SEEK_BACK => Some(KeyCommand::SeekBack),
            constants::KEY_SEEK_FORWARD => Some(KeyCommand::SeekForward),
            constants::KEY_QUIT => Some(KeyCommand::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyCommand),
    FrameExhausted,
    /// The modal selection returned a rectangle with positive area.
    RegionSelected,
    /// The modal selection was cancelled or returned an empty rectangle.
    SelectionEmpty,
    WindowClosed,
    Interrupted,
}

/// Side effect the session performs after entering the new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    BeginSelection,
    ShowPreview,
    SaveCrop,
    DiscardCrop,
    SeekBack,
    SeekForward,
}

pub fn transition(state: SessionState, event: Event) -> (SessionState, Action) {
    use SessionState::*;

    match (state, event) {
        (Finished, _) => (Finished, Action::None),
        (_, Event::WindowClosed) | (_, Event::Interrupted) => (Finished, Action::None),

        (Playing, Event::FrameExhausted) => (Finished, Action::None),
        (Playing, Event::Key(KeyCommand::Quit)) => (Finished, Action::None),
        (Playing, Event::Key(KeyCommand::Select)) => (Selecting, Action::BeginSelection),
        (Playing, Event::Key(KeyCommand::SeekBack)) => (Playing, Action::SeekBack),
        (Playing, Event::Key(KeyCommand::SeekForward)) => (Playing, Action::SeekForward),

        (Selecting, Event::RegionSelected) => (Previewing, Action::ShowPreview),
        (Selecting, Event::SelectionEmpty) => (Playing, Action::None),

        (Previewing, Event::Key(KeyCommand::Select)) => (Playing, Action::SaveCrop),
        (Previewing, Event::Key(KeyCommand::Cancel)) => (Playing, Action::DiscardCrop),

        // Esc while playing, seek/quit keys while previewing, and anything
        // out of order leave the session where it is.
        (state, _) => (state, Action::None),
    }
}
