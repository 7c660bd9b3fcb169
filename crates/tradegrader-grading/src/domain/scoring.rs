//! Grade reports and the rules that produce them.
//!
//! A [`GradeReport`] is either parsed from a language model's
//! `SCORE:` / `GRADE:` / `ANALYSIS:` answer or computed by the heuristic
//! formula used when no model is available.

use tradegrader_core::model::Grade;

/// Score used when a model answer carries none.
pub const DEFAULT_SCORE: u8 = 50;

/// Analysis used when a model answer carries none.
pub const DEFAULT_ANALYSIS: &str = "Trade analysis completed.";

/// Largest jitter the heuristic adds or subtracts.
pub const HEURISTIC_JITTER: i32 = 20;

/// Outcome of grading one trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeReport {
    /// Score in `0..=100`.
    pub score: u8,
    /// Categorical grade.
    pub grade: Grade,
    /// Narrative analysis.
    pub analysis: String,
}

/// Value after the first `marker` on `line`, matched case-insensitively.
fn after_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    // ASCII uppercasing keeps byte offsets, so the index is valid in `line`.
    let start = line.to_ascii_uppercase().find(marker)?;
    Some(line[start + marker.len()..].trim().trim_matches('*').trim())
}

fn parse_score(value: &str) -> Option<u8> {
    let digits: String = value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    let score: u32 = digits.parse().ok()?;
    u8::try_from(score.min(100)).ok()
}

/// Extracts a report from free text.
///
/// Missing or unreadable parts fall back to [`DEFAULT_SCORE`], `Fair` and
/// [`DEFAULT_ANALYSIS`]. The analysis runs from the `ANALYSIS:` line to the
/// end of the text, with blank lines dropped and the rest joined by spaces.
#[must_use]
pub fn parse_grading_text(text: &str) -> GradeReport {
    let mut score = None;
    let mut grade = None;
    let mut analysis: Option<Vec<&str>> = None;

    for line in text.lines() {
        if let Some(parts) = analysis.as_mut() {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
            continue;
        }
        if score.is_none() {
            if let Some(value) = after_marker(line, "SCORE:") {
                score = parse_score(value);
                continue;
            }
        }
        if grade.is_none() {
            if let Some(value) = after_marker(line, "GRADE:") {
                grade = (!value.is_empty()).then(|| Grade::from_label(value));
                continue;
            }
        }
        if let Some(value) = after_marker(line, "ANALYSIS:") {
            analysis = Some(if value.is_empty() { Vec::new() } else { vec![value] });
        }
    }

    let analysis = analysis
        .map(|parts| parts.join(" "))
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| DEFAULT_ANALYSIS.to_owned());

    GradeReport {
        score: score.unwrap_or(DEFAULT_SCORE),
        grade: grade.unwrap_or(Grade::Fair),
        analysis,
    }
}

/// Computes the heuristic report for a trade.
///
/// `score = clamp(50 + jitter + 3 * incoming - 2 * outgoing, 10, 90)`, where
/// `jitter` is expected in `-HEURISTIC_JITTER..=HEURISTIC_JITTER`.
#[must_use]
pub fn heuristic_report(incoming: usize, outgoing: usize, jitter: i32) -> GradeReport {
    let incoming_count = i64::try_from(incoming).unwrap_or(i64::MAX / 4);
    let outgoing_count = i64::try_from(outgoing).unwrap_or(i64::MAX / 4);
    let raw = 50 + i64::from(jitter) + 3 * incoming_count - 2 * outgoing_count;
    let score = u8::try_from(raw.clamp(10, 90)).unwrap_or(DEFAULT_SCORE);
    let grade = Grade::from_score(score);

    let outlook = match score {
        60.. => "favorable",
        40..=59 => "questionable",
        _ => "poor",
    };
    let analysis = format!(
        "Heuristic analysis from your team's perspective: This trade shows {} value. \
         You're getting {incoming} player(s) and giving up {outgoing} player(s). \
         The value exchange appears {outlook} for your team.",
        grade.label().to_lowercase()
    );

    GradeReport {
        score,
        grade,
        analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reads_all_three_fields() {
        let text = "SCORE: 82\nGRADE: Good\nANALYSIS: You upgrade at QB.\nJefferson is a loss.\n";

        let report = parse_grading_text(text);

        assert_eq!(report.score, 82);
        assert_eq!(report.grade, Grade::Good);
        assert_eq!(report.analysis, "You upgrade at QB. Jefferson is a loss.");
    }

    #[test]
    fn test_parse_is_case_insensitive_and_tolerates_decoration() {
        let text = "**Score:** 71/100\n**grade:** very poor\nAnalysis: Mixed.";

        let report = parse_grading_text(text);

        assert_eq!(report.score, 71);
        assert_eq!(report.grade, Grade::VeryPoor);
        assert_eq!(report.analysis, "Mixed.");
    }

    #[test]
    fn test_parse_falls_back_to_defaults() {
        let report = parse_grading_text("I cannot grade this trade.");

        assert_eq!(report.score, DEFAULT_SCORE);
        assert_eq!(report.grade, Grade::Fair);
        assert_eq!(report.analysis, DEFAULT_ANALYSIS);
    }

    #[test]
    fn test_parse_caps_score_at_one_hundred() {
        assert_eq!(parse_grading_text("SCORE: 250").score, 100);
        assert_eq!(parse_grading_text("SCORE: n/a").score, DEFAULT_SCORE);
    }

    #[test]
    fn test_parse_keeps_unknown_grade_labels() {
        let report = parse_grading_text("SCORE: 90\nGRADE: A+");
        assert_eq!(report.grade, Grade::Other("A+".to_owned()));
    }

    #[test]
    fn test_heuristic_without_jitter() {
        let report = heuristic_report(2, 1, 0);

        assert_eq!(report.score, 54);
        assert_eq!(report.grade, Grade::Fair);
        assert!(report.analysis.contains("getting 2 player(s) and giving up 1 player(s)"));
        assert!(report.analysis.contains("appears questionable"));
    }

    #[test]
    fn test_heuristic_is_clamped_to_ten_through_ninety() {
        assert_eq!(heuristic_report(20, 1, HEURISTIC_JITTER).score, 90);
        assert_eq!(heuristic_report(1, 20, -HEURISTIC_JITTER).score, 10);
        assert_eq!(heuristic_report(1, 20, -HEURISTIC_JITTER).grade, Grade::VeryPoor);
    }
}
