//! Completion marker search
//!
//! A segment counts as completed when its demo contains one of the
//! configured marker commands near the end of the recording.

use super::frames::ConsoleCommand;

/// How many trailing console commands are searched
pub const TRAILING_COMMANDS: usize = 200;

/// Where a marker was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerHit {
    /// `console_commands` or `raw_bytes`
    pub location: &'static str,
    /// Tick of the command, when known
    pub tick: Option<i32>,
    /// Matching command text, or the needle for raw hits
    pub text: String,
}

/// Something that can be searched for completion markers
pub trait MarkerProbe {
    /// First hit for any of `needles`
    fn find_marker(&self, needles: &[&str]) -> Option<MarkerHit>;

    fn has_marker(&self, needles: &[&str]) -> bool {
        self.find_marker(needles).is_some()
    }
}

impl MarkerProbe for [ConsoleCommand] {
    fn find_marker(&self, needles: &[&str]) -> Option<MarkerHit> {
        let start = self.len().saturating_sub(TRAILING_COMMANDS);
        self[start..].iter().find_map(|command| {
            needles
                .iter()
                .any(|needle| !needle.is_empty() && command.text.contains(needle))
                .then(|| MarkerHit {
                    location: "console_commands",
                    tick: Some(command.tick),
                    text: command.text.clone(),
                })
        })
    }
}

impl MarkerProbe for [u8] {
    fn find_marker(&self, needles: &[&str]) -> Option<MarkerHit> {
        needles
            .iter()
            .find(|needle| contains_bytes(self, needle.as_bytes()))
            .map(|needle| MarkerHit {
                location: "raw_bytes",
                tick: None,
                text: needle.to_string(),
            })
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}
