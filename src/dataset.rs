//! On-disk layout of a dialogue dataset:
//!
//! ```text
//! <root>/<movie>/<movie>_<c1>_<c2>.json                       dialogue file
//! <root>/<movie>/relationship_eval/llm-relationship_<file>    generated relationships
//! <root>/<movie>/relationships/<stem>_relationships.json      relationship ground truth
//! <root>/<movie>/agesex_eval/llm-agesex_<file>                generated age/sex
//! <root>/<movie>/agesex/<stem>_agesex.json                    age/sex ground truth
//! ```

use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const RELATIONSHIP_EVAL_DIR: &str = "relationship_eval";
pub const RELATIONSHIP_GT_DIR: &str = "relationships";
pub const RELATIONSHIP_PREFIX: &str = "llm-relationship_";
pub const RELATIONSHIP_GT_SUFFIX: &str = "_relationships.json";

pub const AGESEX_EVAL_DIR: &str = "agesex_eval";
pub const AGESEX_GT_DIR: &str = "agesex";
pub const AGESEX_PREFIX: &str = "llm-agesex_";
pub const AGESEX_GT_SUFFIX: &str = "_agesex.json";

/// What kind of annotation a file belongs to; selects folders and names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Relationship,
    AgeSex,
}

impl Task {
    pub fn eval_dir(self) -> &'static str {
        match self {
            Task::Relationship => RELATIONSHIP_EVAL_DIR,
            Task::AgeSex => AGESEX_EVAL_DIR,
        }
    }

    pub fn ground_truth_dir(self) -> &'static str {
        match self {
            Task::Relationship => RELATIONSHIP_GT_DIR,
            Task::AgeSex => AGESEX_GT_DIR,
        }
    }

    pub fn output_prefix(self) -> &'static str {
        match self {
            Task::Relationship => RELATIONSHIP_PREFIX,
            Task::AgeSex => AGESEX_PREFIX,
        }
    }

    fn ground_truth_suffix(self) -> &'static str {
        match self {
            Task::Relationship => RELATIONSHIP_GT_SUFFIX,
            Task::AgeSex => AGESEX_GT_SUFFIX,
        }
    }

    /// `movie_a_b.json` -> `llm-relationship_movie_a_b.json`
    pub fn output_name(self, dialogue_file: &str) -> String {
        format!("{}{}", self.output_prefix(), dialogue_file)
    }

    /// `llm-relationship_movie_a_b.json` -> `movie_a_b_relationships.json`
    pub fn ground_truth_name(self, output_file: &str) -> Option<String> {
        let base = output_file.strip_prefix(self.output_prefix())?;
        let stem = base.strip_suffix(".json")?;
        Some(format!("{stem}{}", self.ground_truth_suffix()))
    }
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| Error::json(path, e))
}

pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_vec_pretty(value).map_err(|e| Error::json(path, e))?;
    fs::write(path, body).map_err(|e| Error::io(path, e))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        out.push(entry.map_err(|e| Error::io(dir, e))?.path());
    }
    out.sort();
    Ok(out)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// One movie folder under the dataset root.
#[derive(Debug, Clone)]
pub struct MovieDir {
    pub name: String,
    pub path: PathBuf,
}

impl MovieDir {
    /// Dialogue files: `.json` files directly inside the folder whose name starts with the movie name.
    pub fn dialogue_files(&self) -> Result<Vec<PathBuf>> {
        Ok(sorted_entries(&self.path)?
            .into_iter()
            .filter(|p| p.is_file())
            .filter(|p| file_name(p).map_or(false, |n| n.ends_with(".json") && n.starts_with(&self.name)))
            .collect())
    }

    pub fn eval_dir(&self, task: Task) -> PathBuf {
        self.path.join(task.eval_dir())
    }

    pub fn ground_truth_dir(&self, task: Task) -> PathBuf {
        self.path.join(task.ground_truth_dir())
    }

    /// Generated files for `task`, paired with where their ground truth should be.
    pub fn generated_files(&self, task: Task) -> Result<Vec<(PathBuf, PathBuf)>> {
        let eval = self.eval_dir(task);
        let gt_dir = self.ground_truth_dir(task);
        let mut out = Vec::new();
        for path in sorted_entries(&eval)? {
            let Some(name) = file_name(&path) else { continue };
            if !path.is_file() || !name.ends_with(".json") {
                continue;
            }
            if let Some(gt) = task.ground_truth_name(name) {
                out.push((path.clone(), gt_dir.join(gt)));
            }
        }
        Ok(out)
    }
}

/// Movie folders under `root`, sorted by name.
pub fn movies(root: &Path) -> Result<Vec<MovieDir>> {
    if !root.is_dir() {
        return Err(Error::MissingRoot(root.to_path_buf()));
    }
    Ok(sorted_entries(root)?
        .into_iter()
        .filter(|p| p.is_dir())
        .filter_map(|p| file_name(&p).map(|n| MovieDir { name: n.to_string(), path: p.clone() }))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn output_and_ground_truth_names_correspond() {
        let t = Task::Relationship;
        let out = t.output_name("heat_neil_vincent.json");
        assert_eq!(out, "llm-relationship_heat_neil_vincent.json");
        assert_eq!(t.ground_truth_name(&out).as_deref(), Some("heat_neil_vincent_relationships.json"));
        assert_eq!(t.ground_truth_name("notes.json"), None);
        assert_eq!(
            Task::AgeSex.ground_truth_name("llm-agesex_heat_a_b.json").as_deref(),
            Some("heat_a_b_agesex.json")
        );
    }

    #[test]
    fn discovers_movies_and_dialogue_files() {
        let root = tempdir().unwrap();
        let heat = root.path().join("heat");
        fs::create_dir_all(heat.join("relationships")).unwrap();
        fs::write(heat.join("heat_a_b.json"), "[]").unwrap();
        fs::write(heat.join("other.json"), "[]").unwrap();
        fs::write(heat.join("heat_notes.txt"), "").unwrap();
        fs::write(root.path().join("stray.json"), "[]").unwrap();

        let movies = movies(root.path()).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].name, "heat");
        let files = movies[0].dialogue_files().unwrap();
        assert_eq!(files, vec![heat.join("heat_a_b.json")]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = tempdir().unwrap();
        let err = movies(&root.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::MissingRoot(_)));
    }

    #[test]
    fn bad_json_reports_path() {
        let root = tempdir().unwrap();
        let p = root.path().join("x.json");
        fs::write(&p, "{").unwrap();
        let err = load_json::<serde_json::Value>(&p).unwrap_err();
        assert!(err.to_string().contains("x.json"));
    }
}
