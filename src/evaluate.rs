//! Evaluation runs over a dataset root. A group (movie) whose ground-truth
//! folder is missing is skipped whole; any single file that is missing or
//! unreadable is skipped with a warning. Inside a generated file a record
//! that does not fit the shape is dropped alone, as if never answered.

use crate::config::RunConfig;
use crate::dataset::{self, MovieDir, Task};
use crate::scoring::{DemographicScoreboard, Scoreboard};
use crate::types::{self, DemographicEntry, RecordSet};
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn load_or_warn<T: DeserializeOwned>(path: &Path) -> Option<T> {
    match dataset::load_json(path) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(error = %e, "error loading file");
            None
        }
    }
}

/// Pairs of (generated, ground truth) for one movie, or `None` if the movie
/// has nothing to evaluate for `task`.
fn file_pairs(movie: &MovieDir, task: Task) -> Result<Option<Vec<(PathBuf, PathBuf)>>> {
    if !movie.eval_dir(task).is_dir() {
        debug!(movie = %movie.name, "no {} folder", task.eval_dir());
        return Ok(None);
    }
    if !movie.ground_truth_dir(task).is_dir() {
        info!(movie = %movie.name, "skipping: no '{}' ground truth folder found", task.ground_truth_dir());
        return Ok(None);
    }
    let mut pairs = Vec::new();
    for (generated, gt) in movie.generated_files(task)? {
        if gt.is_file() {
            pairs.push((generated, gt));
        } else {
            warn!(file = %generated.display(), "ground truth file missing");
        }
    }
    Ok(Some(pairs))
}

pub fn evaluate_relationships(cfg: &RunConfig) -> Result<Scoreboard> {
    let mut board = Scoreboard::new();
    for movie in dataset::movies(&cfg.root_dir)? {
        if !cfg.includes(&movie.name) {
            continue;
        }
        let Some(pairs) = file_pairs(&movie, Task::Relationship)? else { continue };
        for (generated_path, gt_path) in pairs {
            let Some(raw) = load_or_warn::<BTreeMap<String, Value>>(&generated_path) else { continue };
            let (generated, rejected) = types::records_from_values(raw);
            if !rejected.is_empty() {
                warn!(file = %generated_path.display(), ids = ?rejected, "dropping malformed generated records");
            }
            let Some(gt) = load_or_warn::<RecordSet>(&gt_path) else { continue };
            if generated.is_empty() || gt.is_empty() {
                continue;
            }
            board.note_file_processed();
            let items = board.score(&movie.name, &gt, &generated);
            debug!(movie = %movie.name, file = %generated_path.display(), items = items.len(), "scored");
        }
    }
    Ok(board)
}

pub fn evaluate_demographics(cfg: &RunConfig) -> Result<DemographicScoreboard> {
    let mut board = DemographicScoreboard::new();
    for movie in dataset::movies(&cfg.root_dir)? {
        if !cfg.includes(&movie.name) {
            continue;
        }
        let Some(pairs) = file_pairs(&movie, Task::AgeSex)? else { continue };
        for (generated_path, gt_path) in pairs {
            let Some(generated) = load_or_warn::<Vec<DemographicEntry>>(&generated_path) else { continue };
            let Some(gt) = load_or_warn::<Vec<DemographicEntry>>(&gt_path) else { continue };
            if generated.is_empty() || gt.is_empty() {
                continue;
            }
            board.note_file_processed();
            board.score(&movie.name, &gt, &generated);
        }
    }
    Ok(board)
}
