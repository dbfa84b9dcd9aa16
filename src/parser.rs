use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{FormatError, Stage};
use crate::note::*;

static SETTINGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(d|o|b)=\d+(,(d|o|b)=\d+){0,2}$").expect("settings pattern compiles")
});

/// `[duration]pitch[octave][.]`, pitch matched lazily so `c#5` splits as `c#` + `5`.
static NOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<duration>\d+)?(?P<pitch>[^0-9.]+?)(?P<octave>\d+)?(?P<dotted>\.)?$")
        .expect("note pattern compiles")
});

/// Parse an RTTTL string (`[name]:[settings]:notes`) into a Tune
pub fn parse(text: &str) -> Result<Tune, FormatError> {
    if text.is_empty() {
        return Err(FormatError::new(Stage::Sections, "tune is empty", text));
    }

    let sections: Vec<&str> = text.split(':').collect();
    let (name, settings_text, notes_text) = match sections.as_slice() {
        [notes] => ("", None, *notes),
        [first, notes] => {
            if is_settings(first) {
                ("", Some(*first), *notes)
            } else {
                (*first, None, *notes)
            }
        }
        [name, settings, notes] => (*name, Some(*settings), *notes),
        _ => {
            return Err(FormatError::new(
                Stage::Sections,
                "too many sections, expected at most name:settings:notes",
                text,
            ));
        }
    };

    let notes_trimmed = notes_text.trim();
    if notes_trimmed.is_empty() {
        return Err(FormatError::new(Stage::Sections, "note section is empty", text));
    }

    let settings = match settings_text {
        Some(segment) => parse_settings(segment)?,
        None => Settings::default(),
    };
    let mut notes = Vec::new();
    for token in notes_trimmed.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(FormatError::new(Stage::Note, "empty note", notes_trimmed));
        }
        notes.push(parse_note(token, &settings)?);
    }

    let tune = Tune::new(name.trim().to_string(), settings, notes)?;
    tracing::debug!(
        name = tune.name(),
        notes = tune.notes().len(),
        bpm = settings.bpm.get(),
        total_ms = tune.total_duration_ms(),
        "parsed tune"
    );
    Ok(tune)
}

/// Whether a leading section reads as settings rather than a name
fn is_settings(section: &str) -> bool {
    SETTINGS_RE.is_match(&section.trim().to_lowercase())
}

/// Settings seen so far; each key may be filled once.
#[derive(Default)]
struct SettingsBuilder {
    duration: Option<NoteDuration>,
    octave: Option<Octave>,
    bpm: Option<Bpm>,
}

impl SettingsBuilder {
    fn build(self) -> Settings {
        let defaults = Settings::default();
        Settings {
            duration: self.duration.unwrap_or(defaults.duration),
            octave: self.octave.unwrap_or(defaults.octave),
            bpm: self.bpm.unwrap_or(defaults.bpm),
        }
    }
}

fn ensure_unset<T>(slot: &Option<T>, token: &str) -> Result<(), FormatError> {
    if slot.is_some() {
        return Err(FormatError::new(Stage::Settings, "duplicate setting", token));
    }
    Ok(())
}

fn parse_settings(segment: &str) -> Result<Settings, FormatError> {
    let lowered = segment.trim().to_lowercase();
    if lowered.is_empty() {
        return Ok(Settings::default());
    }
    if !SETTINGS_RE.is_match(&lowered) {
        return Err(FormatError::new(
            Stage::Settings,
            "expected comma-separated d=, o= and b= values",
            segment,
        ));
    }

    let mut builder = SettingsBuilder::default();
    for token in lowered.split(',') {
        let Some((key, value)) = token.split_once('=') else {
            return Err(FormatError::new(Stage::Settings, "missing '='", token));
        };
        let number = value.parse::<u32>().ok();
        match key {
            "d" => {
                ensure_unset(&builder.duration, token)?;
                let duration = number.and_then(NoteDuration::from_code).ok_or_else(|| {
                    unsupported_duration(Stage::Settings, value, token)
                })?;
                builder.duration = Some(duration);
            }
            "o" => {
                ensure_unset(&builder.octave, token)?;
                let octave = number
                    .and_then(Octave::new)
                    .ok_or_else(|| unsupported_octave(Stage::Settings, value, token))?;
                builder.octave = Some(octave);
            }
            "b" => {
                ensure_unset(&builder.bpm, token)?;
                let bpm = number.and_then(Bpm::new).ok_or_else(|| {
                    FormatError::new(
                        Stage::Settings,
                        format!(
                            "unsupported beats per minute {}, supported: [{}-{}]",
                            value,
                            Bpm::MIN,
                            Bpm::MAX
                        ),
                        token,
                    )
                })?;
                builder.bpm = Some(bpm);
            }
            _ => {
                return Err(FormatError::new(
                    Stage::Settings,
                    format!("unknown setting '{}'", key),
                    token,
                ));
            }
        }
    }

    Ok(builder.build())
}

fn unsupported_duration(stage: Stage, value: &str, fragment: &str) -> FormatError {
    FormatError::new(
        stage,
        format!(
            "unsupported duration {}, supported durations: {:?}",
            value,
            NoteDuration::codes()
        ),
        fragment,
    )
}

fn unsupported_octave(stage: Stage, value: &str, fragment: &str) -> FormatError {
    FormatError::new(
        stage,
        format!(
            "unsupported octave {}, supported octaves: [{}-{}]",
            value,
            Octave::MIN,
            Octave::MAX
        ),
        fragment,
    )
}

/// Parse a single trimmed note token. Matching ignores case; errors quote
/// the token as written.
fn parse_note(token: &str, settings: &Settings) -> Result<Note, FormatError> {
    let lowered = token.to_lowercase();
    let caps: Captures = NOTE_RE
        .captures(&lowered)
        .ok_or_else(|| FormatError::new(Stage::Note, "pitch missing", token))?;

    let duration = match caps.name("duration") {
        Some(m) => m
            .as_str()
            .parse::<u32>()
            .ok()
            .and_then(NoteDuration::from_code)
            .ok_or_else(|| unsupported_duration(Stage::Note, m.as_str(), token))?,
        None => settings.duration,
    };

    let pitch_token = &caps["pitch"];
    let octave_digits = caps.name("octave").map(|m| m.as_str());

    let pitch = if pitch_token == REST_TOKEN {
        if octave_digits.is_some() {
            return Err(FormatError::new(
                Stage::Note,
                "a rest cannot carry an octave",
                token,
            ));
        }
        Pitch::Rest
    } else {
        let name = NoteName::from_token(pitch_token).ok_or_else(|| {
            FormatError::new(
                Stage::Note,
                format!(
                    "unsupported pitch '{}', supported pitches: {}",
                    pitch_token,
                    PITCH_TOKENS.join(", ")
                ),
                token,
            )
        })?;
        let octave = match octave_digits {
            Some(digits) => digits
                .parse::<u32>()
                .ok()
                .and_then(Octave::new)
                .ok_or_else(|| unsupported_octave(Stage::Note, digits, token))?,
            None => settings.octave,
        };
        Pitch::Tone { name, octave }
    };

    let dotted = caps.name("dotted").is_some();
    let note = Note::new(pitch, duration, dotted, settings);
    tracing::trace!(
        token,
        frequency_hz = note.frequency_hz(),
        duration_ms = note.duration_ms(),
        "note"
    );
    Ok(note)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_of(text: &str) -> Stage {
        parse(text).unwrap_err().stage
    }

    #[test]
    fn test_defaults_without_name_or_settings() {
        let tune = parse(":8C,8D").unwrap();
        assert_eq!(tune.name(), "");
        assert_eq!(*tune.settings(), Settings::default());
        assert_eq!(tune.settings().duration.code(), 4);
        assert_eq!(tune.settings().octave.get(), 6);
        assert_eq!(tune.settings().bpm.get(), 63);
        assert!((tune.settings().whole_note_ms() - 3809.52).abs() < 0.01);
        assert_eq!(tune.notes().len(), 2);
        assert_eq!(tune.notes()[0].octave().map(Octave::get), Some(6));
    }

    #[test]
    fn test_notes_only() {
        let tune = parse("8c,p").unwrap();
        assert_eq!(tune.name(), "");
        assert_eq!(tune.notes().len(), 2);
        assert!(tune.notes()[1].is_rest());
    }

    #[test]
    fn test_settings_without_name() {
        let tune = parse("d=4,o=5,b=63:a").unwrap();
        assert_eq!(tune.name(), "");
        assert_eq!(tune.notes()[0].frequency_hz(), 220.0);
        assert_eq!(tune.notes()[0].duration_ms(), 952);
    }

    #[test]
    fn test_two_sections_name_only() {
        let tune = parse("intro:8c").unwrap();
        assert_eq!(tune.name(), "intro");
        assert_eq!(*tune.settings(), Settings::default());
    }

    #[test]
    fn test_rest_and_dotted_rest() {
        let tune = parse("d=4,o=5,b=63:8p,8p.").unwrap();
        let notes = tune.notes();
        assert_eq!(notes[0].frequency_hz(), 0.0);
        assert_eq!(notes[0].duration_ms(), 476);
        assert!(notes[1].dotted());
        assert_eq!(notes[1].duration_ms(), 714);
    }

    #[test]
    fn test_name_preserved_verbatim() {
        let tune = parse("Fifth:d=4,o=5,b=63:8P,8G5,8G5,8G5,2D#5").unwrap();
        assert_eq!(tune.name(), "Fifth");
        let notes = tune.notes();
        assert_eq!(notes.len(), 5);
        assert!(notes[0].is_rest());
        assert_eq!(
            notes[1].pitch(),
            Pitch::Tone {
                name: NoteName::G,
                octave: Octave::new(5).unwrap()
            }
        );
        assert_eq!(notes[4].frequency_hz(), 155.56);
        assert_eq!(notes[4].duration_ms(), 1905);
    }

    #[test]
    fn test_overrides_and_sharps() {
        let tune = parse("x:d=8,o=4,b=120:16c#7.,a,h").unwrap();
        let notes = tune.notes();
        assert_eq!(notes[0].duration(), NoteDuration::Sixteenth);
        assert_eq!(notes[0].octave().map(Octave::get), Some(7));
        assert!(notes[0].dotted());
        // whole note = 500 * 8 = 4000ms; 4000 / 16 * 1.5 = 375
        assert_eq!(notes[0].duration_ms(), 375);
        assert_eq!(notes[1].frequency_hz(), 440.0);
        assert_eq!(notes[1].duration_ms(), 500);
        assert_eq!(notes[2].pitch(), parse("x:o=4:b").unwrap().notes()[0].pitch());
    }

    #[test]
    fn test_whitespace_trimmed() {
        let tune = parse("  tone : d=8 : 8c , d ").unwrap();
        assert_eq!(tune.name(), "tone");
        assert_eq!(tune.settings().duration, NoteDuration::Eighth);
        assert_eq!(tune.notes().len(), 2);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "Tetris:d=4,o=5,b=160:e6,8b,8c6,8d6,16e6,16d6,8c6,8b,a,8a";
        let first = parse(text).unwrap();
        let second = parse(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_differs_from_empty_notes() {
        let empty = parse("").unwrap_err();
        let blank = parse("x:d=4:").unwrap_err();
        assert_eq!(empty.stage, Stage::Sections);
        assert_eq!(blank.stage, Stage::Sections);
        assert_ne!(empty.message, blank.message);
    }

    #[test]
    fn test_too_many_sections() {
        assert_eq!(stage_of("a:b:c:8c"), Stage::Sections);
    }

    #[test]
    fn test_duplicate_setting_rejected() {
        let err = parse("x:d=4,d=8:8c").unwrap_err();
        assert_eq!(err.stage, Stage::Settings);
        assert_eq!(err.fragment, "d=8");
        // same value twice is still a duplicate
        assert_eq!(stage_of("x:o=5,o=5:8c"), Stage::Settings);
    }

    #[test]
    fn test_settings_out_of_range() {
        assert_eq!(stage_of("x:d=3:8c"), Stage::Settings);
        assert_eq!(stage_of("x:o=8:8c"), Stage::Settings);
        assert_eq!(stage_of("x:b=24:8c"), Stage::Settings);
        assert_eq!(stage_of("x:b=99999999999:8c"), Stage::Settings);
        let err = parse("x:d=3:8c").unwrap_err();
        assert!(err.message.contains("[1, 2, 4, 8, 16, 32]"));
    }

    #[test]
    fn test_malformed_settings_section() {
        assert_eq!(stage_of("x:q=4:8c"), Stage::Settings);
        assert_eq!(stage_of("x:d4:8c"), Stage::Settings);
    }

    #[test]
    fn test_unsupported_pitch_rejected() {
        let err = parse("x::8z").unwrap_err();
        assert_eq!(err.stage, Stage::Note);
        assert_eq!(err.fragment, "8z");
        assert!(err.message.contains("c#"));
    }

    #[test]
    fn test_note_error_quotes_token_as_written() {
        let err = parse("x::8C,8Z").unwrap_err();
        assert_eq!(err.fragment, "8Z");
        assert!(err.message.contains("'z'"));
        assert_eq!(parse("x::4P7").unwrap_err().fragment, "4P7");
    }

    #[test]
    fn test_rest_with_octave_rejected() {
        assert_eq!(stage_of("x::8p5"), Stage::Note);
    }

    #[test]
    fn test_note_errors() {
        assert_eq!(stage_of("x::8"), Stage::Note);
        assert_eq!(stage_of("x::3c"), Stage::Note);
        assert_eq!(stage_of("x::c9"), Stage::Note);
        assert_eq!(stage_of("x::8c,,8d"), Stage::Note);
        assert_eq!(stage_of("x::8c,"), Stage::Note);
        assert_eq!(stage_of("x::d.6"), Stage::Note);
    }
}
