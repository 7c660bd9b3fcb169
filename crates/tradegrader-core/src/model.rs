//! Wire and domain model shared by the engine and the grading service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the trade a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Players the user receives.
    Incoming,
    /// Players the user gives up.
    Outgoing,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incoming => write!(f, "incoming"),
            Self::Outgoing => write!(f, "outgoing"),
        }
    }
}

/// A searchable player. The engine treats it as a suggestion and only ever
/// looks at `display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Full player name.
    pub name: String,
    /// Team abbreviation, e.g. `KC`.
    pub team: String,
    /// Position abbreviation, e.g. `QB`.
    pub position: String,
    /// Canonical string committed to a slot on selection.
    pub display: String,
}

impl Player {
    /// Builds a player with the canonical `"Name (TEAM - POS)"` display string.
    #[must_use]
    pub fn new(name: &str, team: &str, position: &str) -> Self {
        Self {
            name: name.to_owned(),
            team: team.to_owned(),
            position: position.to_owned(),
            display: format!("{name} ({team} - {position})"),
        }
    }
}

/// A search hit as seen by the composition engine.
pub type Suggestion = Player;

/// Categorical verdict derived from a numeric score.
///
/// Grades outside the known set are kept verbatim in [`Grade::Other`], since
/// the grading service is free to answer with its own wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Grade {
    /// 80–100.
    Excellent,
    /// 65–79.
    Good,
    /// 50–64.
    Fair,
    /// 35–49.
    Poor,
    /// 0–34.
    VeryPoor,
    /// Any other label returned by the service.
    Other(String),
}

impl Grade {
    /// Maps a 0–100 score onto the grading scale.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Excellent,
            65..=79 => Self::Good,
            50..=64 => Self::Fair,
            35..=49 => Self::Poor,
            _ => Self::VeryPoor,
        }
    }

    /// Parses a label case-insensitively, keeping unknown labels verbatim.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "excellent" => Self::Excellent,
            "good" => Self::Good,
            "fair" => Self::Fair,
            "poor" => Self::Poor,
            "very poor" => Self::VeryPoor,
            _ => Self::Other(trimmed.to_owned()),
        }
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Grade {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.label().to_owned()
    }
}

/// Coarse advice shown next to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    /// Score of 70 or more.
    Recommended,
    /// Score of 50–69.
    Fair,
    /// Score below 50.
    NotRecommended,
}

/// Result of grading a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Score in `0..=100`.
    pub score: u8,
    /// Categorical grade.
    pub grade: Grade,
    /// Free-text narrative.
    pub analysis: String,
    /// Identifier of the persisted trade record.
    pub trade_id: i64,
}

impl AnalysisResult {
    /// Highest valid score.
    pub const MAX_SCORE: u8 = 100;

    /// Returns true if the score is within `0..=100`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.score <= Self::MAX_SCORE
    }

    /// Returns the recommendation band for this score.
    #[must_use]
    pub fn recommendation(&self) -> Recommendation {
        match self.score {
            70.. => Recommendation::Recommended,
            50..=69 => Recommendation::Fair,
            _ => Recommendation::NotRecommended,
        }
    }
}

/// Body of `POST /api/analyze-trade`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    /// Display strings of the players received.
    pub incoming_players: Vec<String>,
    /// Display strings of the players given up.
    pub outgoing_players: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_new_builds_display_string() {
        let player = Player::new("Patrick Mahomes", "KC", "QB");
        assert_eq!(player.display, "Patrick Mahomes (KC - QB)");
    }

    #[test]
    fn test_grade_from_score_boundaries() {
        assert_eq!(Grade::from_score(100), Grade::Excellent);
        assert_eq!(Grade::from_score(80), Grade::Excellent);
        assert_eq!(Grade::from_score(79), Grade::Good);
        assert_eq!(Grade::from_score(65), Grade::Good);
        assert_eq!(Grade::from_score(64), Grade::Fair);
        assert_eq!(Grade::from_score(50), Grade::Fair);
        assert_eq!(Grade::from_score(49), Grade::Poor);
        assert_eq!(Grade::from_score(35), Grade::Poor);
        assert_eq!(Grade::from_score(34), Grade::VeryPoor);
        assert_eq!(Grade::from_score(0), Grade::VeryPoor);
    }

    #[test]
    fn test_grade_keeps_unknown_labels_verbatim() {
        let grade: Grade = serde_json::from_value(serde_json::json!("A+")).unwrap();
        assert_eq!(grade, Grade::Other("A+".to_owned()));
        assert_eq!(serde_json::to_value(&grade).unwrap(), "A+");
    }

    #[test]
    fn test_grade_serializes_very_poor_with_space() {
        assert_eq!(
            serde_json::to_value(Grade::VeryPoor).unwrap(),
            serde_json::json!("Very Poor")
        );
        assert_eq!(Grade::from_label(" very poor "), Grade::VeryPoor);
    }

    #[test]
    fn test_analysis_result_deserializes_service_payload() {
        let payload = serde_json::json!({
            "score": 82,
            "grade": "Good",
            "analysis": "Solid upgrade at QB.",
            "trade_id": 7
        });

        let result: AnalysisResult = serde_json::from_value(payload.clone()).unwrap();

        assert_eq!(result.score, 82);
        assert_eq!(result.grade, Grade::Good);
        assert_eq!(result.trade_id, 7);
        assert_eq!(serde_json::to_value(&result).unwrap(), payload);
    }

    #[test]
    fn test_recommendation_bands() {
        let mut result = AnalysisResult {
            score: 70,
            grade: Grade::Good,
            analysis: String::new(),
            trade_id: 1,
        };
        assert_eq!(result.recommendation(), Recommendation::Recommended);
        result.score = 69;
        assert_eq!(result.recommendation(), Recommendation::Fair);
        result.score = 49;
        assert_eq!(result.recommendation(), Recommendation::NotRecommended);
    }

    #[test]
    fn test_out_of_range_score_is_not_well_formed() {
        let result = AnalysisResult {
            score: 101,
            grade: Grade::Excellent,
            analysis: String::new(),
            trade_id: 1,
        };
        assert!(!result.is_well_formed());
    }
}
