use crate::anonymize::ParticipantMap;
use crate::dataset::{self, MovieDir, Task};
use crate::evidence::reconstruct;
use crate::llm::Llm;
use crate::parse::parse_record;
use crate::transcript::render_indexed;
use crate::types::{AnnotationRecord, Interaction, RecordSet};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const RELATIONSHIPS: [&str; 5] = ["Romantic", "Platonic", "Professional", "Antagonistic", "Familial"];
pub const PARSE_FAILURE: &str = "LLM Parse Failure";

pub fn build_relationship_prompt(transcript: &str) -> String {
    format!(
        r#"
You are a relationship analyst. Analyze the following dialogue interaction between two characters (Person A and Person B).

TASK:
1. Classify the relationship between them into exactly one of these categories: {categories}.
2. Identify specific lines (by their [index]) that act as evidence for this classification.
3. Determine if the evidence is "Explicit" (directly stated) or "Implied" (subtext).

INPUT DIALOGUE:
{transcript}

OUTPUT FORMAT:
Provide a raw JSON object. Do not explain. Follow this schema exactly:
{{
    "relationship": "Category",
    "evidence": [
      {{
        "line_indices": [0, 2],
        "text": "Full text of lines 0 and 2 combined...",
        "type": "Implied"
      }}
    ]
}}
"#,
        categories = RELATIONSHIPS.join(", "),
    )
}

/// Outcome for one interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// Service failed or answered with nothing.
    NoResponse,
    /// Answer could not be parsed; a placeholder record stands in.
    Placeholder(AnnotationRecord),
    Parsed(AnnotationRecord),
}

impl Annotation {
    pub fn into_record(self) -> Option<AnnotationRecord> {
        match self {
            Annotation::NoResponse => None,
            Annotation::Placeholder(r) | Annotation::Parsed(r) => Some(r),
        }
    }
}

pub async fn annotate_interaction(client: &dyn Llm, interaction: &Interaction) -> Annotation {
    let participants = ParticipantMap::from_lines(interaction);
    let prompt = build_relationship_prompt(&render_indexed(interaction, &participants));

    let raw = match client.generate(&prompt).await {
        Ok(raw) if !raw.is_empty() => raw,
        Ok(_) => return Annotation::NoResponse,
        Err(e) => {
            warn!(error = %e, "generation request failed");
            return Annotation::NoResponse;
        }
    };

    match parse_record::<AnnotationRecord>(&raw) {
        Some(mut record) => {
            reconstruct(&mut record.evidence, interaction, &participants);
            Annotation::Parsed(record)
        }
        None => Annotation::Placeholder(AnnotationRecord::placeholder(PARSE_FAILURE)),
    }
}

/// Annotates every interaction of a dialogue file, keyed by interaction index.
pub async fn annotate_file(client: &dyn Llm, interactions: &[Interaction]) -> RecordSet {
    let mut out = RecordSet::new();
    for (i, interaction) in interactions.iter().enumerate() {
        match annotate_interaction(client, interaction).await {
            Annotation::NoResponse => info!(interaction = i, "skipping interaction (no response)"),
            Annotation::Placeholder(r) => {
                warn!(interaction = i, "failed to parse JSON response");
                out.insert(i.to_string(), r);
            }
            Annotation::Parsed(r) => {
                out.insert(i.to_string(), r);
            }
        }
    }
    out
}

/// Reads a dialogue file, annotates it, writes the result into `output_dir`.
/// A file that cannot be read is logged and skipped.
pub async fn process_file(client: &dyn Llm, path: &Path, output_dir: &Path) -> Result<Option<PathBuf>> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else { return Ok(None) };
    info!(file = name, "processing");
    let interactions: Vec<Interaction> = match dataset::load_json(path) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "failed to load dialogue file");
            return Ok(None);
        }
    };

    let records = annotate_file(client, &interactions).await;
    let out_path = output_dir.join(Task::Relationship.output_name(name));
    dataset::save_json(&out_path, &records).with_context(|| format!("writing {}", out_path.display()))?;
    info!(path = %out_path.display(), "saved");
    Ok(Some(out_path))
}

pub async fn process_movie(client: &dyn Llm, movie: &MovieDir) -> Result<Vec<PathBuf>> {
    let eval_dir = movie.eval_dir(Task::Relationship);
    dataset::ensure_dir(&eval_dir)?;
    let mut written = Vec::new();
    for file in movie.dialogue_files()? {
        if let Some(p) = process_file(client, &file, &eval_dir).await? {
            written.push(p);
        }
    }
    Ok(written)
}
