//! Results rendering — display order, top-pick flag and score tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::analysis::{AnalysisResult, CandidateAnalysis};

/// Presentation band for a suitability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Strong,   // ≥ 8
    Moderate, // 5 – 7
    Weak,     // < 5
}

impl ScoreTier {
    pub fn for_score(score: i64) -> Self {
        if score >= 8 {
            ScoreTier::Strong
        } else if score >= 5 {
            ScoreTier::Moderate
        } else {
            ScoreTier::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCard {
    pub candidate_name: String,
    pub suitability_score: i64,
    pub summary: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub is_top_pick: bool,
    pub tier: ScoreTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResults {
    pub top_candidate_name: String,
    pub cards: Vec<RankedCard>,
    pub analyzed_at: DateTime<Utc>,
}

impl RankedResults {
    pub fn top_pick(&self) -> Option<&RankedCard> {
        self.cards.iter().find(|c| c.is_top_pick)
    }
}

/// Orders analyses by score, highest first, keeping the service's order among ties.
///
/// At most one card is flagged: the first, in display order, whose name equals
/// `top_candidate_name` exactly. No match flags nothing.
pub fn rank(result: &AnalysisResult) -> RankedResults {
    let mut sorted: Vec<&CandidateAnalysis> = result.candidate_analyses.iter().collect();
    // sort_by is stable
    sorted.sort_by(|a, b| b.suitability_score.cmp(&a.suitability_score));

    let mut flagged = false;
    let cards = sorted
        .into_iter()
        .map(|analysis| {
            let is_top_pick = !flagged && analysis.candidate_name == result.top_candidate_name;
            flagged |= is_top_pick;
            RankedCard {
                candidate_name: analysis.candidate_name.clone(),
                suitability_score: analysis.suitability_score,
                summary: analysis.summary.clone(),
                pros: analysis.pros.clone(),
                cons: analysis.cons.clone(),
                is_top_pick,
                tier: ScoreTier::for_score(analysis.suitability_score),
            }
        })
        .collect();

    RankedResults {
        top_candidate_name: result.top_candidate_name.clone(),
        cards,
        analyzed_at: Utc::now(),
    }
}
