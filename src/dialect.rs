//! Directive vocabularies for the command stream.
//!
//! A dialect is three templates: one for tones, one for silences and the
//! marker that starts a comment. The default speaks Marlin-style G-code.
//! Other firmwares can be described in a small text file.

use std::str::FromStr;

use crate::render::CommandFormat;

const FREQUENCY: &str = "{frequency}";
const DURATION: &str = "{duration}";

/// Template-driven `CommandFormat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    /// Line for a tone; `{frequency}` is integer Hz, `{duration}` is ms
    pub tone: String,
    /// Line for a silence; `{duration}` is ms
    pub silence: String,
    /// Prefix for annotation lines
    pub comment: String,
}

impl Dialect {
    /// `M300 S<hz> P<ms>` to beep, `G4 P<ms>` to dwell, `;` for comments
    pub fn marlin() -> Self {
        Self {
            tone: "M300 S{frequency} P{duration}".to_string(),
            silence: "G4 P{duration}".to_string(),
            comment: ";".to_string(),
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::marlin()
    }
}

impl CommandFormat for Dialect {
    fn tone(&self, frequency_hz: u32, duration_ms: u32) -> String {
        self.tone
            .replace(FREQUENCY, &frequency_hz.to_string())
            .replace(DURATION, &duration_ms.to_string())
    }

    fn silence(&self, duration_ms: u32) -> String {
        self.silence.replace(DURATION, &duration_ms.to_string())
    }

    fn annotation(&self, text: &str) -> String {
        format!("{}{}", self.comment, text)
    }
}

/// Parse a single "key: value" line. Returns (key, value) or None.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let colon = trimmed.find(':')?;
    let key = trimmed[..colon].trim();
    let value = trimmed[colon + 1..].trim();
    Some((key, value))
}

/// Parse a dialect description.
///
/// Format (one per line, optional comments with #):
/// ```text
/// # Marlin
/// tone: M300 S{frequency} P{duration}
/// silence: G4 P{duration}
/// comment: ;
/// ```
/// Missing keys keep the Marlin template.
impl FromStr for Dialect {
    type Err = String;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let mut dialect = Dialect::marlin();

        for (line_num, line) in content.lines().enumerate() {
            let Some((key, value)) = parse_line(line) else {
                if !line.trim().is_empty() && !line.trim().starts_with('#') {
                    return Err(format!("expected 'key: value' at line {}", line_num + 1));
                }
                continue;
            };
            match key {
                "tone" => {
                    if !value.contains(FREQUENCY) || !value.contains(DURATION) {
                        return Err(format!(
                            "tone template at line {} needs {} and {}",
                            line_num + 1,
                            FREQUENCY,
                            DURATION
                        ));
                    }
                    dialect.tone = value.to_string();
                }
                "silence" => {
                    if !value.contains(DURATION) {
                        return Err(format!(
                            "silence template at line {} needs {}",
                            line_num + 1,
                            DURATION
                        ));
                    }
                    dialect.silence = value.to_string();
                }
                "comment" => dialect.comment = value.to_string(),
                _ => {
                    return Err(format!("unknown key '{}' at line {}", key, line_num + 1));
                }
            }
        }

        Ok(dialect)
    }
}
