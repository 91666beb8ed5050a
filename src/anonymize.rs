use crate::types::{DialogueLine, Interaction, UNKNOWN};
use std::collections::HashMap;

/// Bijection between real speaker names and "Person X" labels, built in
/// first-appearance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantMap {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

/// Label for the `n`th distinct speaker: A..Z, then AA, AB, ...
pub fn label_for(n: usize) -> String {
    let mut n = n + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.reverse();
    format!("Person {}", letters.into_iter().collect::<String>())
}

impl ParticipantMap {
    /// Scope = one interaction.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a DialogueLine>) -> Self {
        let mut map = Self::default();
        for line in lines {
            if !map.forward.contains_key(&line.speaker) {
                let label = label_for(map.forward.len());
                map.forward.insert(line.speaker.clone(), label.clone());
                map.reverse.insert(label, line.speaker.clone());
            }
        }
        map
    }

    /// Scope = a whole dialogue file, interactions flattened in order.
    pub fn from_interactions(interactions: &[Interaction]) -> Self {
        Self::from_lines(interactions.iter().flatten())
    }

    /// Display label for a speaker. Names outside the scope show as "Unknown".
    pub fn label(&self, speaker: &str) -> &str {
        self.forward.get(speaker).map(String::as_str).unwrap_or(UNKNOWN)
    }

    pub fn real_name(&self, label: &str) -> Option<&str> {
        self.reverse.get(label).map(String::as_str)
    }
}
