use crate::anonymize::ParticipantMap;
use crate::types::{DialogueLine, Interaction};
use unicode_segmentation::UnicodeSegmentation;

pub const INTERACTION_SEPARATOR: &str = "--- [New Interaction] ---";
pub const OMISSION_MARKER: &str = "\n...[SECTION OMITTED FOR LENGTH]...\n";

fn speaker_line(line: &DialogueLine, participants: &ParticipantMap) -> String {
    format!("{}: {}", participants.label(&line.speaker), line.utterance)
}

/// `[i] Person A: ...` per line, 0-based within the interaction.
pub fn render_indexed(interaction: &[DialogueLine], participants: &ParticipantMap) -> String {
    interaction
        .iter()
        .enumerate()
        .map(|(i, line)| format!("[{i}] {}", speaker_line(line, participants)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct FlattenCfg {
    pub max_chars: usize,
}

/// Whole file as one script, every interaction followed by a separator line,
/// then capped to `max_chars` keeping both ends.
pub fn render_flattened(interactions: &[Interaction], participants: &ParticipantMap, cfg: FlattenCfg) -> String {
    let mut parts = Vec::new();
    for interaction in interactions {
        parts.extend(interaction.iter().map(|line| speaker_line(line, participants)));
        parts.push(INTERACTION_SEPARATOR.to_string());
    }
    cap_middle(&parts.join("\n"), cfg.max_chars)
}

/// Keeps the first and last `max_chars / 2` characters with an omission
/// marker between them. Counts grapheme clusters so nothing is split mid-character.
pub fn cap_middle(text: &str, max_chars: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max_chars {
        return text.to_string();
    }
    let half = max_chars / 2;
    let head: String = graphemes[..half].concat();
    let tail: String = graphemes[graphemes.len() - half..].concat();
    format!("{head}{OMISSION_MARKER}{tail}")
}
