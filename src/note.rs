//! Value types for parsed tunes and the pitch/duration arithmetic behind them.

use serde::Serialize;

use crate::error::{FormatError, Stage};

/// Tuning reference: A in the base octave.
pub const STANDARD_PITCH_HZ: f64 = 440.0;

/// Octave the semitone offsets are relative to.
pub const BASE_OCTAVE: u8 = 4;

const SEMITONES_PER_OCTAVE: i32 = 12;

/// Musical note names (chromatic scale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoteName {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl NoteName {
    /// Look up a lower-case pitch token. `h` is the German name for B.
    pub fn from_token(token: &str) -> Option<Self> {
        let name = match token {
            "c" => NoteName::C,
            "c#" => NoteName::CSharp,
            "d" => NoteName::D,
            "d#" => NoteName::DSharp,
            "e" => NoteName::E,
            "f" => NoteName::F,
            "f#" => NoteName::FSharp,
            "g" => NoteName::G,
            "g#" => NoteName::GSharp,
            "a" => NoteName::A,
            "a#" => NoteName::ASharp,
            "b" | "h" => NoteName::B,
            _ => return None,
        };
        Some(name)
    }

    /// Half steps away from A within the same octave (C=-9, B=+2)
    pub fn offset_from_a(self) -> i32 {
        match self {
            NoteName::C => -9,
            NoteName::CSharp => -8,
            NoteName::D => -7,
            NoteName::DSharp => -6,
            NoteName::E => -5,
            NoteName::F => -4,
            NoteName::FSharp => -3,
            NoteName::G => -2,
            NoteName::GSharp => -1,
            NoteName::A => 0,
            NoteName::ASharp => 1,
            NoteName::B => 2,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::CSharp => "C#",
            NoteName::D => "D",
            NoteName::DSharp => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::FSharp => "F#",
            NoteName::G => "G",
            NoteName::GSharp => "G#",
            NoteName::A => "A",
            NoteName::ASharp => "A#",
            NoteName::B => "B",
        }
    }
}

/// Every pitch token the grammar accepts, rest marker last.
pub const PITCH_TOKENS: [&str; 14] = [
    "c", "c#", "d", "d#", "e", "f", "f#", "g", "g#", "a", "a#", "b", "h", "p",
];

/// Token for a rest.
pub const REST_TOKEN: &str = "p";

/// Octave number, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Octave(u8);

impl Octave {
    pub const MIN: u8 = 4;
    pub const MAX: u8 = 7;

    pub fn new(value: u32) -> Option<Self> {
        if (Self::MIN as u32..=Self::MAX as u32).contains(&value) {
            Some(Octave(value as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Note length as a divisor of a whole note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u32")]
pub enum NoteDuration {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl NoteDuration {
    pub const ALL: [NoteDuration; 6] = [
        NoteDuration::Whole,
        NoteDuration::Half,
        NoteDuration::Quarter,
        NoteDuration::Eighth,
        NoteDuration::Sixteenth,
        NoteDuration::ThirtySecond,
    ];

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.code() == code)
    }

    /// The divisor as written in a tune (1, 2, 4, 8, 16, 32)
    pub fn code(self) -> u32 {
        match self {
            NoteDuration::Whole => 1,
            NoteDuration::Half => 2,
            NoteDuration::Quarter => 4,
            NoteDuration::Eighth => 8,
            NoteDuration::Sixteenth => 16,
            NoteDuration::ThirtySecond => 32,
        }
    }

    /// Legal codes, for error messages.
    pub fn codes() -> Vec<u32> {
        Self::ALL.iter().map(|d| d.code()).collect()
    }
}

impl From<NoteDuration> for u32 {
    fn from(duration: NoteDuration) -> Self {
        duration.code()
    }
}

/// Tempo in beats per minute, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bpm(u16);

impl Bpm {
    pub const MIN: u16 = 25;
    pub const MAX: u16 = 900;

    pub fn new(value: u32) -> Option<Self> {
        if (Self::MIN as u32..=Self::MAX as u32).contains(&value) {
            Some(Bpm(value as u16))
        } else {
            None
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

/// What sounds: a named pitch in an octave, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Pitch {
    Rest,
    Tone { name: NoteName, octave: Octave },
}

/// Equal-tempered frequency for a pitched note, rounded to two decimals.
///
/// Offsets grow by an octave for every octave *below* the base one, so a
/// higher octave number yields a lower frequency (`A5` is 220 Hz). Tunes
/// written for the target devices rely on this.
pub fn frequency_hz(name: NoteName, octave: Octave) -> f64 {
    let offset = name.offset_from_a()
        + SEMITONES_PER_OCTAVE * (BASE_OCTAVE as i32 - octave.get() as i32);
    let raw = 2.0_f64.powf(offset as f64 / SEMITONES_PER_OCTAVE as f64) * STANDARD_PITCH_HZ;
    (raw * 100.0).round_ties_even() / 100.0
}

/// Realized length in whole milliseconds, rounding half to even.
pub fn duration_ms(whole_note_ms: f64, duration: NoteDuration, dotted: bool) -> u32 {
    let mut raw = whole_note_ms / duration.code() as f64;
    if dotted {
        raw *= 1.5;
    }
    raw.round_ties_even() as u32
}

/// A single note of a tune, with its frequency and length worked out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pitch: Pitch,
    duration: NoteDuration,
    dotted: bool,
    frequency_hz: f64,
    duration_ms: u32,
}

impl Note {
    /// Lengths are taken relative to the whole note of `settings`, which is
    /// always long enough that even a 1/32 note lasts at least 2ms.
    pub fn new(pitch: Pitch, duration: NoteDuration, dotted: bool, settings: &Settings) -> Self {
        let frequency_hz = match pitch {
            Pitch::Rest => 0.0,
            Pitch::Tone { name, octave } => frequency_hz(name, octave),
        };
        Self {
            pitch,
            duration,
            dotted,
            frequency_hz,
            duration_ms: duration_ms(settings.whole_note_ms(), duration, dotted),
        }
    }

    pub fn pitch(&self) -> Pitch {
        self.pitch
    }

    pub fn duration(&self) -> NoteDuration {
        self.duration
    }

    pub fn dotted(&self) -> bool {
        self.dotted
    }

    /// 0 for rests
    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.pitch, Pitch::Rest)
    }

    pub fn octave(&self) -> Option<Octave> {
        match self.pitch {
            Pitch::Rest => None,
            Pitch::Tone { octave, .. } => Some(octave),
        }
    }
}

/// Resolved tune-wide defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub duration: NoteDuration,
    pub octave: Octave,
    pub bpm: Bpm,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            duration: NoteDuration::Quarter,
            octave: Octave(6),
            bpm: Bpm(63),
        }
    }
}

impl Settings {
    /// One beat lasts a `duration` note, so a whole note is that many beats.
    pub fn whole_note_ms(&self) -> f64 {
        (60_000.0 / self.bpm.get() as f64) * self.duration.code() as f64
    }
}

/// A full parsed tune. Always holds at least one note, all built against
/// the tune's own settings; only the parser creates one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tune {
    name: String,
    settings: Settings,
    notes: Vec<Note>,
}

impl Tune {
    pub(crate) fn new(
        name: String,
        settings: Settings,
        notes: Vec<Note>,
    ) -> Result<Self, FormatError> {
        if notes.is_empty() {
            return Err(FormatError::new(Stage::Sections, "note section is empty", name));
        }
        Ok(Self {
            name,
            settings,
            notes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Notes in playback order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.notes.iter().map(|n| n.duration_ms as u64).sum()
    }
}
