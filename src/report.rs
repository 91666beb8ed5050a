use crate::scoring::{DemographicScoreboard, Scoreboard};
use std::fmt::Write;

const WIDTH: usize = 110;

fn ratio_cell(pct: f64, num: usize, den: usize) -> String {
    format!("{pct:6.2}% ({num}/{den})")
}

pub fn render_relationship_report(board: &Scoreboard) -> String {
    let rule = "=".repeat(WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(
        out,
        "{:<30} | {:<25} | {:<28} | {:<15}",
        "MOVIE", "RELATIONSHIP ACCURACY", "EVIDENCE RECALL (Line Match)", "TYPE AGREEMENT"
    );
    let _ = writeln!(out, "{rule}");
    for (movie, s) in board.groups() {
        let _ = writeln!(
            out,
            "{:<30} | {:<25} | {:<28} | {:6.2}%",
            movie,
            ratio_cell(s.accuracy(), s.correct, s.total),
            format!("{:6.2}% (avg. GT line coverage)", s.average_recall()),
            s.average_type_agreement(),
        );
    }
    let t = board.totals();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<30} | {:<25} | {:<28} | {:6.2}%",
        "OVERALL",
        ratio_cell(t.accuracy(), t.correct, t.total),
        format!("{:6.2}%", t.average_recall()),
        t.average_type_agreement(),
    );
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Total Files Processed: {}", board.files_processed());
    let _ = writeln!(
        out,
        "\n* Evidence recall: if ground truth cites lines [1,2,3] and the model cites [1,5], the score is 33% (1/3)."
    );
    let _ = writeln!(out, "  Extra lines cited by the model (line 5) are not penalized.");
    out
}

pub fn render_demographic_report(board: &DemographicScoreboard) -> String {
    let rule = "=".repeat(70);
    let mut out = String::new();
    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "{:<30} | {:<16} | {:<16}", "MOVIE", "AGE ACCURACY", "SEX ACCURACY");
    let _ = writeln!(out, "{rule}");
    for (movie, s) in board.groups() {
        let _ = writeln!(
            out,
            "{:<30} | {:<16} | {:<16}",
            movie,
            ratio_cell(s.age_accuracy(), s.age_correct, s.total),
            ratio_cell(s.sex_accuracy(), s.sex_correct, s.total),
        );
    }
    let t = board.totals();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<30} | {:<16} | {:<16}",
        "OVERALL",
        ratio_cell(t.age_accuracy(), t.age_correct, t.total),
        ratio_cell(t.sex_accuracy(), t.sex_correct, t.total),
    );
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Total Files Processed: {}", board.files_processed());
    out
}
