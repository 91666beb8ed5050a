mod support;

use dialscore_rs::config::RunConfig;
use dialscore_rs::dataset;
use dialscore_rs::demographics;
use dialscore_rs::evaluate::evaluate_demographics;
use dialscore_rs::transcript::{INTERACTION_SEPARATOR, OMISSION_MARKER};
use serde_json::json;
use std::sync::{Arc, Mutex};
use support::{line, read_json, write_json, FakeLlm};
use tempfile::tempdir;

#[tokio::test]
async fn infers_and_scores_demographics() {
    let root = tempdir().unwrap();
    write_json(
        &root.path().join("jaws/jaws_brody_hooper.json"),
        &json!([
            [line("BRODY", "You're gonna need a bigger boat."), line("HOOPER", "Yeah.")],
            [line("HOOPER", "Look at this."), line("QUINT", "Nah.")],
        ]),
    );
    let seen = Arc::new(Mutex::new(String::new()));
    let seen_in = seen.clone();
    let llm = FakeLlm::new(move |prompt| {
        *seen_in.lock().unwrap() = prompt.to_string();
        "```json\n{\"Person A\": {\"age\": \"Adult\", \"sex\": \"Male\"}, \"Person B\": {\"age\": \"Young Adult\"}}\n```".to_string()
    });

    let movie = dataset::movies(root.path()).unwrap().remove(0);
    let written = demographics::process_movie(&llm, &movie, 12_000).await.unwrap();
    assert_eq!(llm.calls(), 1);

    let prompt = seen.lock().unwrap().clone();
    assert!(prompt.contains("Person A: You're gonna need a bigger boat.\nPerson B: Yeah.\n--- [New Interaction] ---"));
    assert!(prompt.contains("Person C: Nah."));
    assert!(prompt.contains(INTERACTION_SEPARATOR));

    let out = read_json(&written[0]);
    assert_eq!(
        out,
        json!([
            {"char1": "BRODY", "age": "Adult", "sex": "Male"},
            {"char2": "HOOPER", "age": "Young Adult", "sex": "Unknown"}
        ])
    );

    write_json(
        &root.path().join("jaws/agesex/jaws_brody_hooper_agesex.json"),
        &json!([
            {"char1": "BRODY", "age": "adult", "sex": "Male"},
            {"char2": "HOOPER", "age": "Young Adult", "sex": "Male"}
        ]),
    );
    let board = evaluate_demographics(&RunConfig { root_dir: root.path().to_path_buf(), ..Default::default() }).unwrap();
    let totals = board.totals();
    assert_eq!((totals.total, totals.age_correct, totals.sex_correct), (2, 2, 1));
    assert_eq!(board.files_processed(), 1);
}

#[tokio::test]
async fn long_transcripts_are_capped_and_bad_answers_skipped() {
    let root = tempdir().unwrap();
    let long: Vec<_> = (0..200).map(|i| line(if i % 2 == 0 { "A" } else { "B" }, &format!("line number {i}"))).collect();
    write_json(&root.path().join("up/up_a_b.json"), &json!([long]));
    write_json(&root.path().join("up/up_empty.json"), &json!([]));

    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen_in = seen.clone();
    let llm = FakeLlm::new(move |prompt| {
        seen_in.lock().unwrap().push(prompt.to_string());
        "no idea".to_string()
    });

    let movie = dataset::movies(root.path()).unwrap().remove(0);
    let written = demographics::process_movie(&llm, &movie, 500).await.unwrap();
    assert!(written.is_empty());
    // the empty file never reaches the service
    assert_eq!(llm.calls(), 1);
    let prompt = seen.lock().unwrap()[0].clone();
    assert!(prompt.contains(OMISSION_MARKER));
    assert!(prompt.contains("Person A: line number 0"));
    assert!(prompt.contains("Person B: line number 199"));
    assert!(!root.path().join("up/agesex_eval/llm-agesex_up_a_b.json").exists());
}
