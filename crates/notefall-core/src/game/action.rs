use strum::IntoStaticStr;

use crate::note::MusicalNote;

/// Transition label fed to the reducer
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Action {
    /// One frame of simulated time
    Tick,
    /// Key-down on a column
    PressColumn(u8),
    /// Key-up on a column
    ReleaseColumn(u8),
    /// Notes released by the scheduler
    AddNoteGroup(Vec<MusicalNote>),
    /// The note source is exhausted
    EndOfSong,
}

impl Action {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::PressColumn(column) | Action::ReleaseColumn(column) => {
                write!(f, "{}({})", self.name(), column)
            }
            Action::AddNoteGroup(notes) => write!(f, "{}[{}]", self.name(), notes.len()),
            Action::Tick | Action::EndOfSong => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Action::Tick.to_string(), "Tick");
        assert_eq!(Action::PressColumn(2).to_string(), "PressColumn(2)");
        assert_eq!(Action::AddNoteGroup(Vec::new()).to_string(), "AddNoteGroup[0]");
    }
}
