//! Turns a parsed tune into device commands, one per note.
//!
//! `render` produces protocol-neutral `Command`s; `to_text` writes them out
//! through a `CommandFormat`, which owns the actual directive vocabulary.

use serde::Serialize;

use crate::note::Tune;

/// A command for the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Command {
    /// Free text, emitted as a comment (only ever first)
    Annotation { text: String },
    /// Beep at a frequency for a duration
    Tone { frequency_hz: u32, duration_ms: u32 },
    /// Stay quiet for a duration
    Silence { duration_ms: u32 },
}

/// Renderer configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Prepend the tune name as an annotation when it is non-empty
    pub include_name_annotation: bool,
}

/// Writes commands as lines of a device command stream.
pub trait CommandFormat {
    fn tone(&self, frequency_hz: u32, duration_ms: u32) -> String;
    fn silence(&self, duration_ms: u32) -> String;
    fn annotation(&self, text: &str) -> String;

    /// One line for `command`, without the trailing newline
    fn line(&self, command: &Command) -> String {
        match command {
            Command::Annotation { text } => self.annotation(text),
            Command::Tone {
                frequency_hz,
                duration_ms,
            } => self.tone(*frequency_hz, *duration_ms),
            Command::Silence { duration_ms } => self.silence(*duration_ms),
        }
    }
}

/// Build the command sequence for a tune, in note order
pub fn render(tune: &Tune, options: &RenderOptions) -> Vec<Command> {
    let mut commands = Vec::with_capacity(tune.notes().len() + 1);

    if options.include_name_annotation && !tune.name().is_empty() {
        commands.push(Command::Annotation {
            text: tune.name().replace(['\r', '\n'], " "),
        });
    }

    for note in tune.notes() {
        if note.is_rest() {
            commands.push(Command::Silence {
                duration_ms: note.duration_ms(),
            });
        } else {
            commands.push(Command::Tone {
                frequency_hz: note.frequency_hz().round_ties_even() as u32,
                duration_ms: note.duration_ms(),
            });
        }
    }

    tracing::debug!(
        name = tune.name(),
        commands = commands.len(),
        "rendered tune"
    );
    commands
}

/// Newline-terminated text for a command sequence
pub fn to_text(commands: &[Command], format: &dyn CommandFormat) -> String {
    let mut out = String::new();
    for command in commands {
        out.push_str(&format.line(command));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    struct Plain;

    impl CommandFormat for Plain {
        fn tone(&self, frequency_hz: u32, duration_ms: u32) -> String {
            format!("tone {} {}", frequency_hz, duration_ms)
        }

        fn silence(&self, duration_ms: u32) -> String {
            format!("wait {}", duration_ms)
        }

        fn annotation(&self, text: &str) -> String {
            format!("# {}", text)
        }
    }

    const FIFTH: &str = "fifth:d=4,o=5,b=63:8P,8G5,8G5,8G5,2D#5";

    #[test]
    fn test_one_command_per_note() {
        let tune = parse(FIFTH).unwrap();
        let commands = render(&tune, &RenderOptions::default());
        assert_eq!(commands.len(), tune.notes().len());
        assert_eq!(commands[0], Command::Silence { duration_ms: 476 });
        assert_eq!(
            commands[1],
            Command::Tone {
                frequency_hz: 196,
                duration_ms: 476
            }
        );
        assert_eq!(
            commands[4],
            Command::Tone {
                frequency_hz: 156,
                duration_ms: 1905
            }
        );
    }

    #[test]
    fn test_identical_notes_not_merged() {
        let tune = parse(FIFTH).unwrap();
        let commands = render(&tune, &RenderOptions::default());
        assert_eq!(commands[1], commands[2]);
        assert_eq!(commands[2], commands[3]);
    }

    #[test]
    fn test_annotation_only_when_requested_and_named() {
        let annotate = RenderOptions {
            include_name_annotation: true,
        };
        for (text, named) in [(FIFTH, true), ("d=4:8c,8d", false), ("8c", false)] {
            let tune = parse(text).unwrap();
            let plain = render(&tune, &RenderOptions::default());
            let annotated = render(&tune, &annotate);
            assert_eq!(plain.len(), tune.notes().len());
            assert_eq!(annotated.len(), tune.notes().len() + usize::from(named));
        }

        let commands = render(&parse(FIFTH).unwrap(), &annotate);
        assert_eq!(
            commands[0],
            Command::Annotation {
                text: "fifth".into()
            }
        );
    }

    #[test]
    fn test_to_text() {
        let tune = parse("intro:d=4,o=4,b=60:a,p").unwrap();
        let commands = render(
            &tune,
            &RenderOptions {
                include_name_annotation: true,
            },
        );
        assert_eq!(
            to_text(&commands, &Plain),
            "# intro\ntone 440 1000\nwait 1000\n"
        );
    }

    #[test]
    fn test_multiline_name_stays_one_line() {
        let tune = parse("two\nlines:d=4,o=4,b=60:a").unwrap();
        let commands = render(
            &tune,
            &RenderOptions {
                include_name_annotation: true,
            },
        );
        let text = to_text(&commands, &Plain);
        assert_eq!(text, "# two lines\ntone 440 1000\n");
        assert_eq!(text.lines().count(), commands.len());
    }

    #[test]
    fn test_json_form() {
        let commands = vec![
            Command::Tone {
                frequency_hz: 440,
                duration_ms: 250,
            },
            Command::Silence { duration_ms: 100 },
        ];
        let json = serde_json::to_value(&commands).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"type": "tone", "frequency_hz": 440, "duration_ms": 250},
                {"type": "silence", "duration_ms": 100}
            ])
        );
    }
}
