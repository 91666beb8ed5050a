mod support;

use dialscore_rs::config::RunConfig;
use dialscore_rs::dataset::{self, Task};
use dialscore_rs::evaluate::evaluate_relationships;
use dialscore_rs::relationships;
use dialscore_rs::report::render_relationship_report;
use serde_json::json;
use std::path::Path;
use support::{line, read_json, write_json, DownLlm, FakeLlm};
use tempfile::tempdir;

fn seed_heat(root: &Path) {
    write_json(
        &root.join("heat/heat_neil_eady.json"),
        &json!([
            [line("NEIL", "Want a coffee?"), line("EADY", "I'd love one."), line("NEIL", "I'm Neil.")],
            [line("VINCENT", "Freeze!"), line("NEIL", "Not today.")],
        ]),
    );
}

fn chatty_model() -> FakeLlm {
    FakeLlm::new(|prompt| {
        if prompt.contains("[0] Person A: Want a coffee?") {
            r#"Sure! {"relationship": "romantic", "evidence": [{"line_indices": [1, 5], "text": "they flirt", "type": "Explicit"}]} Hope that helps!"#.to_string()
        } else {
            "I cannot help with that.".to_string()
        }
    })
}

fn cfg(root: &Path) -> RunConfig {
    RunConfig { root_dir: root.to_path_buf(), ..Default::default() }
}

#[tokio::test]
async fn annotate_then_evaluate_end_to_end() {
    let root = tempdir().unwrap();
    seed_heat(root.path());
    let movie = dataset::movies(root.path()).unwrap().remove(0);

    let llm = chatty_model();
    let written = relationships::process_movie(&llm, &movie).await.unwrap();
    assert_eq!(llm.calls(), 2);
    assert_eq!(written.len(), 1);
    let out_path = root.path().join("heat/relationship_eval/llm-relationship_heat_neil_eady.json");
    assert_eq!(written[0], out_path);

    let out = read_json(&out_path);
    assert_eq!(out["0"]["relationship"], "romantic");
    assert_eq!(out["0"]["evidence"][0]["text"], "Person B: I'd love one.");
    assert_eq!(out["0"]["evidence"][0]["line_indices"], json!([1, 5]));
    assert_eq!(out["1"], json!({"relationship": "Unknown", "evidence": [], "error": "LLM Parse Failure"}));

    write_json(
        &root.path().join("heat/relationships/heat_neil_eady_relationships.json"),
        &json!({
            "0": {"relationship": "Romantic", "evidence": [{"line_indices": [1, 2, 3], "text": "", "type": "Definitive"}]},
            "1": {"relationship": "Antagonistic", "evidence": [{"line_indices": [0], "text": "", "type": "Definitive"}]},
            "2": {"relationship": "Platonic", "evidence": []}
        }),
    );

    let board = evaluate_relationships(&cfg(root.path())).unwrap();
    assert_eq!(board.files_processed(), 1);
    let heat = board.group("heat").unwrap();
    assert_eq!((heat.correct, heat.total), (1, 3));
    assert_eq!(heat.recall_count, 2);
    assert!((heat.average_recall() - 100.0 / 6.0).abs() < 1e-9);
    assert!((heat.average_type_agreement() - 50.0).abs() < 1e-9);

    let text = render_relationship_report(&board);
    assert!(text.contains(" 33.33% (1/3)"));
    assert!(text.contains("Total Files Processed: 1"));
}

#[tokio::test]
async fn unreachable_service_writes_empty_map() {
    let root = tempdir().unwrap();
    seed_heat(root.path());
    let movie = dataset::movies(root.path()).unwrap().remove(0);

    let written = relationships::process_movie(&DownLlm, &movie).await.unwrap();
    assert_eq!(read_json(&written[0]), json!({}));

    write_json(
        &root.path().join("heat/relationships/heat_neil_eady_relationships.json"),
        &json!({"0": {"relationship": "Romantic", "evidence": []}}),
    );
    let board = evaluate_relationships(&cfg(root.path())).unwrap();
    assert_eq!(board.files_processed(), 0);
    assert!(board.group("heat").is_none());
}

#[test]
fn group_without_ground_truth_folder_is_skipped() {
    let root = tempdir().unwrap();
    let rec = json!({"0": {"relationship": "Platonic", "evidence": [{"line_indices": [0], "text": "", "type": "Implied"}]}});
    write_json(&root.path().join("alien/relationship_eval/llm-relationship_alien_ripley_ash.json"), &rec);
    write_json(&root.path().join("heat/relationship_eval/llm-relationship_heat_a_b.json"), &rec);
    write_json(&root.path().join("heat/relationships/heat_a_b_relationships.json"), &rec);
    // generated file whose ground truth is missing
    write_json(&root.path().join("heat/relationship_eval/llm-relationship_heat_c_d.json"), &rec);

    let board = evaluate_relationships(&cfg(root.path())).unwrap();
    assert!(board.group("alien").is_none());
    assert_eq!(board.files_processed(), 1);
    let totals = board.totals();
    assert_eq!(totals.accuracy(), 100.0);
    assert_eq!(totals.average_recall(), 100.0);
}

#[test]
fn malformed_generated_record_only_costs_itself() {
    let root = tempdir().unwrap();
    write_json(
        &root.path().join("heat/relationship_eval/llm-relationship_heat_a_b.json"),
        &json!({
            "0": {"relationship": "Platonic", "evidence": [{"line_indices": [0], "text": "", "type": "Implied"}]},
            "1": {"relationship": "Professional", "evidence": [{"line_indices": ["2"], "text": "", "type": "Explicit"}]},
            "2": {"relationship": "Familial", "evidence": "see lines 1 and 2"}
        }),
    );
    write_json(
        &root.path().join("heat/relationships/heat_a_b_relationships.json"),
        &json!({
            "0": {"relationship": "Platonic", "evidence": [{"line_indices": [0], "text": "", "type": "Implied"}]},
            "1": {"relationship": "Professional", "evidence": [{"line_indices": [2], "text": "", "type": "Definitive"}]},
            "2": {"relationship": "Familial", "evidence": []}
        }),
    );

    let board = evaluate_relationships(&cfg(root.path())).unwrap();
    assert_eq!(board.files_processed(), 1);
    let heat = board.group("heat").unwrap();
    // "1" keeps its label but cites nothing; "2" is unreadable and counts as unanswered
    assert_eq!((heat.correct, heat.total), (2, 3));
    assert_eq!(heat.recall_count, 2);
    assert!((heat.average_recall() - 50.0).abs() < 1e-9);
}

#[test]
fn movie_filter_limits_evaluation() {
    let root = tempdir().unwrap();
    let rec = json!({"0": {"relationship": "Familial", "evidence": []}});
    for movie in ["heat", "jaws"] {
        write_json(&root.path().join(format!("{movie}/relationship_eval/llm-relationship_{movie}_a_b.json")), &rec);
        write_json(&root.path().join(format!("{movie}/relationships/{movie}_a_b_relationships.json")), &rec);
    }
    let run = RunConfig { movie: Some("jaws".into()), ..cfg(root.path()) };
    let board = evaluate_relationships(&run).unwrap();
    let names: Vec<_> = board.groups().map(|(n, _)| n.to_string()).collect();
    assert_eq!(names, vec!["jaws"]);
    assert_eq!(Task::Relationship.output_name("jaws_a_b.json"), "llm-relationship_jaws_a_b.json");
}

#[test]
fn missing_root_is_fatal() {
    let root = tempdir().unwrap();
    assert!(evaluate_relationships(&cfg(&root.path().join("absent"))).is_err());
}
