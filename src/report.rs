use std::fmt::Write;

use crate::catalog::Catalog;
use crate::engine;
use crate::import::ImportedProfile;
use crate::models::{PredictionResult, Recommendation};

#[derive(Debug, Clone)]
pub struct ScoredStudent {
    pub student: String,
    pub result: PredictionResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationCount {
    pub recommendation: Recommendation,
    pub count: usize,
}

pub fn score_students(
    students: &[ImportedProfile],
    jitter: &mut impl engine::Jitter,
) -> Vec<ScoredStudent> {
    let mut scored: Vec<ScoredStudent> = students
        .iter()
        .map(|imported| ScoredStudent {
            student: imported.student.clone(),
            result: engine::predict(&imported.profile, jitter),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.result
            .placement_probability
            .partial_cmp(&a.result.placement_probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored
}

pub fn summarize_recommendations(scored: &[ScoredStudent]) -> Vec<RecommendationCount> {
    let mut counts: std::collections::BTreeMap<Recommendation, usize> =
        std::collections::BTreeMap::new();

    for student in scored {
        for recommendation in &student.result.recommendations {
            *counts.entry(*recommendation).or_insert(0) += 1;
        }
    }

    let mut summaries: Vec<RecommendationCount> = counts
        .into_iter()
        .map(|(recommendation, count)| RecommendationCount {
            recommendation,
            count,
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

pub fn score_line(scored: &ScoredStudent) -> String {
    format!(
        "- {}: placement {:.0}% ({}), expected {:.1} LPA, {} recommendations, {} gaps",
        scored.student,
        scored.result.placement_probability * 100.0,
        if scored.result.placement_prediction == 1 {
            "likely"
        } else {
            "at risk"
        },
        scored.result.expected_salary,
        scored.result.recommendations.len(),
        scored.result.skill_gaps.len()
    )
}

pub fn build_report(result: &PredictionResult, catalog: &Catalog) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Placement Prediction Report");
    let _ = writeln!(
        output,
        "Placement probability {:.1}% ({}), expected salary {:.2} LPA",
        result.placement_probability * 100.0,
        if result.placement_prediction == 1 {
            "likely to be placed"
        } else {
            "placement at risk"
        },
        result.expected_salary
    );
    let _ = writeln!(
        output,
        "Baseline score before noise: {:.3}",
        engine::placement_score(&result.profile)
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Placement Factors");

    for impact in engine::factor_impacts(&result.profile) {
        let _ = writeln!(output, "- {}: {:.1}", impact.factor, impact.impact);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Skill Profile");

    for dimension in engine::skill_profile(&result.profile) {
        let _ = writeln!(output, "- {}: {:.0}/100", dimension.factor, dimension.impact);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");

    if result.recommendations.is_empty() {
        let _ = writeln!(output, "No additional courses needed right now.");
    } else {
        for recommendation in &result.recommendations {
            let _ = writeln!(output, "- {}", recommendation);
            for course in catalog
                .courses_for_recommendation(recommendation.label())
                .iter()
                .take(3)
            {
                let _ = writeln!(
                    output,
                    "  - [{}]({}) by {} ({:?})",
                    course.name, course.url, course.provider, course.level
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Skill Gaps");

    if result.skill_gaps.is_empty() {
        let _ = writeln!(output, "No skill gaps found.");
    } else {
        for gap in &result.skill_gaps {
            let _ = writeln!(output, "- {}", gap);
        }
    }

    output
}

pub fn build_batch_report(scored: &[ScoredStudent], limit: usize) -> String {
    let mut output = String::new();
    let summaries = summarize_recommendations(scored);

    let _ = writeln!(output, "# Cohort Placement Outlook");
    let _ = writeln!(output, "{} students scored", scored.len());
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendation Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No recommendations issued.");
    } else {
        for summary in &summaries {
            let _ = writeln!(output, "- {}: {} students", summary.recommendation, summary.count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students");

    if scored.is_empty() {
        let _ = writeln!(output, "No students in this import.");
    } else {
        for student in scored.iter().take(limit) {
            let _ = writeln!(output, "{}", score_line(student));
        }
    }

    output
}
