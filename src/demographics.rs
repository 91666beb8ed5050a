use crate::anonymize::{label_for, ParticipantMap};
use crate::dataset::{self, MovieDir, Task};
use crate::llm::Llm;
use crate::parse::parse_response;
use crate::transcript::{render_flattened, FlattenCfg};
use crate::types::{AgeClass, CharSlot, DemographicEntry, Interaction, SexClass, UNKNOWN};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn build_demographic_prompt(transcript: &str) -> String {
    let ages = AgeClass::ALL.iter().map(|a| a.label()).collect::<Vec<_>>().join(", ");
    let ranges = AgeClass::ALL
        .iter()
        .map(|a| format!("{}: {}", a.label(), a.range()))
        .collect::<Vec<_>>()
        .join(", ");
    let sexes = SexClass::ALL.iter().map(|s| s.label()).collect::<Vec<_>>().join(", ");
    format!(
        r#"
You are an expert character profiler. Read the following dialogue transcript between Person A and Person B.
Analyze their vocabulary, tone, life stage references, and physical descriptions to determine their Sex and Age Class.

POSSIBLE AGES: {ages}
(Definitions: {ranges})

POSSIBLE SEXES: {sexes}

TRANSCRIPT:
{transcript}

OUTPUT FORMAT:
Provide a JSON object exactly like this:
{{
  "Person A": {{ "age": "Adult", "sex": "Male" }},
  "Person B": {{ "age": "Adolescent", "sex": "Female" }}
}}
Do not add any other text.
"#
    )
}

fn field(person: Option<&Value>, key: &str) -> String {
    person
        .and_then(|p| p.get(key))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Maps the service's per-label answer back onto real names. Only the
/// first two participants are reported; absent fields become "Unknown".
pub fn entries_from_response(response: &Value, participants: &ParticipantMap) -> Vec<DemographicEntry> {
    let mut out = Vec::new();
    for (n, slot) in [CharSlot::First, CharSlot::Second].into_iter().enumerate() {
        let label = label_for(n);
        let Some(name) = participants.real_name(&label) else { continue };
        let person = response.get(&label);
        out.push(DemographicEntry::new(slot, name, field(person, "age"), field(person, "sex")));
    }
    out
}

/// `None` when the file is empty, the service gave nothing, or the answer did not parse.
pub async fn infer_file(client: &dyn Llm, interactions: &[Interaction], max_chars: usize) -> Option<Vec<DemographicEntry>> {
    if interactions.is_empty() {
        info!("empty file, skipping");
        return None;
    }
    let participants = ParticipantMap::from_interactions(interactions);
    let transcript = render_flattened(interactions, &participants, FlattenCfg { max_chars });
    let prompt = build_demographic_prompt(&transcript);

    let raw = match client.generate(&prompt).await {
        Ok(raw) if !raw.is_empty() => raw,
        Ok(_) => {
            info!("no response from LLM");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "generation request failed");
            return None;
        }
    };

    match parse_response(&raw) {
        Some(value) => Some(entries_from_response(&value, &participants)),
        None => {
            warn!(response = %raw, "failed to parse JSON response");
            None
        }
    }
}

pub async fn process_file(client: &dyn Llm, path: &Path, output_dir: &Path, max_chars: usize) -> Result<Option<PathBuf>> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else { return Ok(None) };
    info!(file = name, "processing");
    let interactions: Vec<Interaction> = match dataset::load_json(path) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "failed to load dialogue file");
            return Ok(None);
        }
    };

    let Some(entries) = infer_file(client, &interactions, max_chars).await else { return Ok(None) };
    let out_path = output_dir.join(Task::AgeSex.output_name(name));
    dataset::save_json(&out_path, &entries).with_context(|| format!("writing {}", out_path.display()))?;
    info!(path = %out_path.display(), "saved");
    Ok(Some(out_path))
}

pub async fn process_movie(client: &dyn Llm, movie: &MovieDir, max_chars: usize) -> Result<Vec<PathBuf>> {
    let eval_dir = movie.eval_dir(Task::AgeSex);
    dataset::ensure_dir(&eval_dir)?;
    let mut written = Vec::new();
    for file in movie.dialogue_files()? {
        if let Some(p) = process_file(client, &file, &eval_dir, max_chars).await? {
            written.push(p);
        }
    }
    Ok(written)
}
