use crate::anonymize::ParticipantMap;
use crate::types::{DialogueLine, EvidenceItem};

/// Rewrites each item's `text` from the transcript itself, as
/// `Person X: utterance` lines in the order the indices are listed.
/// Out-of-range indices are skipped.
pub fn reconstruct(evidence: &mut [EvidenceItem], interaction: &[DialogueLine], participants: &ParticipantMap) {
    for item in evidence.iter_mut() {
        item.text = item
            .line_indices
            .iter()
            .filter_map(|&idx| usize::try_from(idx).ok())
            .filter_map(|idx| interaction.get(idx))
            .map(|line| format!("{}: {}", participants.label(&line.speaker), line.utterance))
            .collect::<Vec<_>>()
            .join("\n");
    }
}
