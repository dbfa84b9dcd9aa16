//! RTTTL ring-tone parsing and conversion to device command streams.
//!
//! ```text
//! "fifth:d=4,o=5,b=63:8P,8G5" -> parse -> Tune -> render -> [Silence, Tone] -> "G4 P476\nM300 S196 P476\n"
//! ```

pub mod dialect;
pub mod error;
pub mod library;
pub mod note;
pub mod parser;
pub mod render;

pub use dialect::Dialect;
pub use error::{FormatError, Stage};
pub use note::{Note, NoteDuration, NoteName, Octave, Pitch, Settings, Tune};
pub use parser::parse;
pub use render::{Command, CommandFormat, RenderOptions, render, to_text};

/// Parse a tune and write it out as command text in one go
pub fn compile(
    text: &str,
    options: &RenderOptions,
    format: &dyn CommandFormat,
) -> Result<String, FormatError> {
    let tune = parse(text)?;
    Ok(to_text(&render(&tune, options), format))
}
