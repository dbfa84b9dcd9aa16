use std::fmt;

use thiserror::Error;

/// Which part of a tune string an error was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Splitting the text into name / settings / notes
    Sections,
    /// The `d=..,o=..,b=..` segment
    Settings,
    /// A single note token
    Note,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Sections => "sections",
            Stage::Settings => "settings",
            Stage::Note => "note",
        };
        f.write_str(name)
    }
}

/// A malformed tune. Parsing stops at the first one; no partial tune is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {stage}: {message} ('{fragment}')")]
pub struct FormatError {
    pub stage: Stage,
    pub message: String,
    /// The offending substring of the input
    pub fragment: String,
}

impl FormatError {
    pub fn new(stage: Stage, message: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            fragment: fragment.into(),
        }
    }
}
