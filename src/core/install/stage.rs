use std::fmt;

/// Stages of one install attempt, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    Preparing,
    Downloading,
    Extracting,
    Verifying,
    Moving,
    InstallingModloader,
    InstallingProfile,
    CleaningUp,
    Done,
    /// Entered from any failed stage; undoes partial work.
    RollingBack,
}

impl Stage {
    /// The stage entered after this one completes. `Done` is terminal.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Idle => Some(Stage::Preparing),
            Stage::Preparing => Some(Stage::Downloading),
            Stage::Downloading => Some(Stage::Extracting),
            Stage::Extracting => Some(Stage::Verifying),
            Stage::Verifying => Some(Stage::Moving),
            Stage::Moving => Some(Stage::InstallingModloader),
            Stage::InstallingModloader => Some(Stage::InstallingProfile),
            Stage::InstallingProfile => Some(Stage::CleaningUp),
            Stage::CleaningUp => Some(Stage::Done),
            Stage::Done | Stage::RollingBack => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::RollingBack)
    }

    /// Status text shown when the stage is entered.
    pub fn status_text(self) -> Option<&'static str> {
        match self {
            Stage::Idle | Stage::Preparing | Stage::Done => None,
            Stage::Downloading => Some("Downloading"),
            Stage::Extracting => Some("Extracting"),
            Stage::Verifying => Some("Verifying"),
            Stage::Moving => Some("Moving Game Directory"),
            Stage::InstallingModloader => Some("Installing Modloader"),
            Stage::InstallingProfile => Some("Inserting Profile"),
            Stage::CleaningUp | Stage::RollingBack => Some("Cleaning up"),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
