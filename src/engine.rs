use rand::Rng;

use crate::models::{
    CareerRole, FactorImpact, PredictionResult, Recommendation, RoleFit, SkillFit, SkillGap,
    StudentProfile,
};

pub const ESSENTIAL_SKILLS: [&str; 3] = ["Python", "SQL", "Web Development"];
pub const JITTER_SPAN: f64 = 0.05;
pub const MIN_SALARY_LPA: f64 = 3.0;
pub const MAX_SALARY_LPA: f64 = 25.0;

/// Source of the noise term added to the placement score.
pub trait Jitter {
    fn sample(&mut self) -> f64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&mut self) -> f64 {
        0.0
    }
}

#[derive(Debug)]
pub struct UniformJitter<R> {
    rng: R,
}

impl<R: Rng> UniformJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl UniformJitter<rand::rngs::ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> Jitter for UniformJitter<R> {
    fn sample(&mut self) -> f64 {
        self.rng.random_range(-JITTER_SPAN..=JITTER_SPAN)
    }
}

impl Jitter for Box<dyn Jitter> {
    fn sample(&mut self) -> f64 {
        (**self).sample()
    }
}

fn raw_score(profile: &StudentProfile) -> f64 {
    let cgpa = profile.cgpa / 10.0;
    let internships = (profile.internships as f64 / 3.0).min(1.0);
    let skills = (profile.skill_count() as f64 / 5.0).min(1.0);
    let communication = profile.communication_skills as f64 / 10.0;
    let projects = (profile.projects as f64 / 10.0).min(1.0);
    let backlog_penalty = (1.0 - profile.backlogs as f64 * 0.1).max(0.0);

    cgpa * 0.25
        + internships * 0.20
        + skills * 0.18
        + communication * 0.15
        + projects * 0.12
        + backlog_penalty * 0.10
}

/// Weighted placement score with no noise, clamped to [0, 1].
pub fn placement_score(profile: &StudentProfile) -> f64 {
    raw_score(profile).clamp(0.0, 1.0)
}

pub fn predict_placement(profile: &StudentProfile, jitter: &mut impl Jitter) -> f64 {
    (raw_score(profile) + jitter.sample()).clamp(0.0, 1.0)
}

pub fn predict_salary(profile: &StudentProfile, placement_prob: f64) -> f64 {
    let mut salary = 5.0;
    salary += (profile.cgpa - 6.0) * 0.5;
    salary += profile.internships as f64 * 1.5;
    salary += profile.skill_count() as f64 * 0.3;
    salary += profile.college_tier.salary_bonus();
    salary += profile.certifications as f64 * 0.5;
    salary += profile.hackathons_won as f64 * 0.8;
    salary *= 0.7 + placement_prob * 0.3;

    salary.clamp(MIN_SALARY_LPA, MAX_SALARY_LPA)
}

pub fn generate_recommendations(
    profile: &StudentProfile,
    placement_prob: f64,
) -> Vec<Recommendation> {
    let checks = [
        (profile.cgpa < 7.5, Recommendation::AcademicExcellence),
        (profile.backlogs > 0, Recommendation::BacklogClearance),
        (
            !profile.has_skill("Python") && placement_prob > 0.3,
            Recommendation::PythonFundamentals,
        ),
        (!profile.has_skill("SQL"), Recommendation::SqlDatabases),
        (
            !profile.has_skill("Machine Learning") && placement_prob > 0.6,
            Recommendation::MachineLearningBasics,
        ),
        (profile.internships == 0, Recommendation::InternshipWorkshop),
        (profile.communication_skills < 7, Recommendation::CommunicationMastery),
        (profile.aptitude_score < 70, Recommendation::AptitudeTraining),
        (profile.coding_score < 70, Recommendation::DataStructuresAlgorithms),
        (
            placement_prob > 0.7 && profile.has_skill("Cloud Computing"),
            Recommendation::AwsCloudPractitioner,
        ),
        (
            placement_prob > 0.7 && profile.has_skill("Web Development"),
            Recommendation::AdvancedFullStack,
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(hit, recommendation)| hit.then_some(recommendation))
        .collect()
}

pub fn analyze_skill_gaps(profile: &StudentProfile) -> Vec<SkillGap> {
    let mut gaps: Vec<SkillGap> = ESSENTIAL_SKILLS
        .into_iter()
        .filter(|skill| !profile.has_skill(skill))
        .map(SkillGap::MissingSkill)
        .collect();

    if profile.internships == 0 {
        gaps.push(SkillGap::NoInternship);
    }
    if profile.projects < 3 {
        gaps.push(SkillGap::ThinPortfolio);
    }
    if profile.cgpa < 7.0 {
        gaps.push(SkillGap::LowCgpa);
    }
    if profile.backlogs > 2 {
        gaps.push(SkillGap::ManyBacklogs);
    }
    if profile.communication_skills < 6 {
        gaps.push(SkillGap::WeakCommunication);
    }

    gaps
}

pub fn predict(profile: &StudentProfile, jitter: &mut impl Jitter) -> PredictionResult {
    let placement_probability = predict_placement(profile, jitter);

    PredictionResult {
        placement_probability,
        placement_prediction: u8::from(placement_probability > 0.5),
        expected_salary: predict_salary(profile, placement_probability),
        recommendations: generate_recommendations(profile, placement_probability),
        skill_gaps: analyze_skill_gaps(profile),
        profile: profile.clone(),
    }
}

pub fn factor_impacts(profile: &StudentProfile) -> Vec<FactorImpact> {
    vec![
        FactorImpact {
            factor: "CGPA",
            impact: (profile.cgpa * 3.0).min(25.0),
        },
        FactorImpact {
            factor: "Internships",
            impact: (profile.internships as f64 * 5.0).min(20.0),
        },
        FactorImpact {
            factor: "Skills",
            impact: (profile.skill_count() as f64 * 2.0).min(18.0),
        },
        FactorImpact {
            factor: "Communication",
            impact: (profile.communication_skills as f64 * 1.5).min(15.0),
        },
        FactorImpact {
            factor: "Projects",
            impact: (profile.projects as f64).min(12.0),
        },
    ]
}

pub fn skill_profile(profile: &StudentProfile) -> Vec<FactorImpact> {
    let experience = (profile.internships + profile.projects) as f64;

    vec![
        FactorImpact {
            factor: "Technical",
            impact: (profile.skill_count() as f64 * 20.0).min(100.0),
        },
        FactorImpact {
            factor: "Communication",
            impact: profile.communication_skills as f64 * 10.0,
        },
        FactorImpact {
            factor: "Problem Solving",
            impact: profile.problem_solving as f64 * 10.0,
        },
        FactorImpact {
            factor: "Experience",
            impact: (experience * 10.0).min(100.0),
        },
        FactorImpact {
            factor: "Academic",
            impact: (profile.cgpa * 10.0).min(100.0),
        },
    ]
}

/// Estimated 0-100 proficiency for one role skill. Skills the profile says nothing about score 0.
pub fn skill_proficiency(profile: &StudentProfile, skill: &str) -> u32 {
    let listed = |name: &str| if profile.has_skill(name) { 70 } else { 0 };

    match skill {
        "Python Programming" => listed("Python"),
        "JavaScript/TypeScript" => listed("JavaScript"),
        "React.js" => listed("React"),
        "SQL & Databases" => listed("SQL"),
        "Machine Learning" => listed("ML"),
        "Cloud Computing" => listed("Cloud"),
        "Problem Solving" => profile.problem_solving.saturating_mul(10),
        "Communication Skills" => profile.communication_skills.saturating_mul(10),
        _ => 0,
    }
}

pub fn role_fit(profile: &StudentProfile, role: &CareerRole) -> RoleFit {
    RoleFit {
        role_id: role.id.clone(),
        title: role.title.clone(),
        skills: role
            .required_skills
            .iter()
            .map(|requirement| SkillFit {
                skill: requirement.skill.clone(),
                level: requirement.level,
                importance: requirement.importance,
                proficiency: skill_proficiency(profile, &requirement.skill),
            })
            .collect(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::CollegeTier;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub(crate) fn strong_profile() -> StudentProfile {
        StudentProfile {
            cgpa: 9.0,
            college_tier: CollegeTier::Tier1,
            backlogs: 0,
            current_backlogs: 0,
            internships: 3,
            projects: 10,
            certifications: 0,
            hackathons_won: 0,
            extracurricular: 0,
            skills: [
                "Python",
                "SQL",
                "Web Development",
                "Machine Learning",
                "Cloud Computing",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            communication_skills: 9,
            problem_solving: 8,
            teamwork: 8,
            leadership: 7,
            time_management: 8,
            aptitude_score: 90,
            coding_score: 90,
        }
    }

    pub(crate) fn weak_profile() -> StudentProfile {
        StudentProfile {
            cgpa: 6.2,
            college_tier: CollegeTier::Tier3,
            backlogs: 4,
            current_backlogs: 2,
            internships: 0,
            projects: 1,
            certifications: 0,
            hackathons_won: 0,
            extracurricular: 1,
            skills: ["Java".to_string()].into_iter().collect(),
            communication_skills: 4,
            problem_solving: 5,
            teamwork: 6,
            leadership: 3,
            time_management: 4,
            aptitude_score: 55,
            coding_score: 40,
        }
    }

    struct Fixed(f64);

    impl Jitter for Fixed {
        fn sample(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn score_follows_weighted_sum() {
        let profile = weak_profile();
        let expected = 0.62 * 0.25
            + 0.0 * 0.20
            + 0.2 * 0.18
            + 0.4 * 0.15
            + 0.1 * 0.12
            + 0.6 * 0.10;
        assert!((placement_score(&profile) - expected).abs() < 1e-9);
        assert!((predict_placement(&profile, &mut NoJitter) - expected).abs() < 1e-9);
    }

    #[test]
    fn jitter_is_added_then_clamped() {
        let profile = strong_profile();
        let base = placement_score(&profile);
        let nudged = predict_placement(&profile, &mut Fixed(-0.05));
        assert!((nudged - (base - 0.05)).abs() < 1e-9);

        let mut perfect = strong_profile();
        perfect.cgpa = 10.0;
        perfect.communication_skills = 10;
        assert_eq!(predict_placement(&perfect, &mut Fixed(0.05)), 1.0);
    }

    #[test]
    fn placement_stays_in_unit_range() {
        let mut jitter = UniformJitter::new(StdRng::seed_from_u64(7));
        let mut extreme = weak_profile();
        extreme.cgpa = 0.0;
        extreme.communication_skills = 0;
        extreme.backlogs = 30;
        extreme.skills.clear();
        let mut oversized = strong_profile();
        oversized.cgpa = 14.0;
        oversized.communication_skills = 15;

        for _ in 0..500 {
            for profile in [&extreme, &oversized, &weak_profile(), &strong_profile()] {
                let p = predict_placement(profile, &mut jitter);
                assert!((0.0..=1.0).contains(&p), "out of range: {p}");
            }
        }
    }

    #[test]
    fn uniform_jitter_respects_span() {
        let mut jitter = UniformJitter::new(StdRng::seed_from_u64(42));
        for _ in 0..1000 {
            let sample = jitter.sample();
            assert!((-JITTER_SPAN..=JITTER_SPAN).contains(&sample));
        }
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let profile = weak_profile();
        let a = predict_placement(&profile, &mut UniformJitter::new(StdRng::seed_from_u64(3)));
        let b = predict_placement(&profile, &mut UniformJitter::new(StdRng::seed_from_u64(3)));
        assert_eq!(a, b);
    }

    #[test]
    fn salary_matches_formula() {
        let profile = strong_profile();
        let base = 5.0 + 3.0 * 0.5 + 3.0 * 1.5 + 5.0 * 0.3 + 2.0;
        let expected = base * (0.7 + 0.8 * 0.3);
        assert!((predict_salary(&profile, 0.8) - expected).abs() < 1e-9);
    }

    #[test]
    fn salary_is_clamped() {
        let mut rich = strong_profile();
        rich.internships = 12;
        rich.certifications = 20;
        rich.hackathons_won = 10;
        assert_eq!(predict_salary(&rich, 1.0), MAX_SALARY_LPA);

        let mut poor = weak_profile();
        poor.cgpa = 0.0;
        poor.skills.clear();
        assert_eq!(predict_salary(&poor, 0.0), MIN_SALARY_LPA);

        for prob in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for profile in [strong_profile(), weak_profile()] {
                let salary = predict_salary(&profile, prob);
                assert!((MIN_SALARY_LPA..=MAX_SALARY_LPA).contains(&salary));
            }
        }
    }

    #[test]
    fn weak_profile_gets_remedial_recommendations_in_order() {
        let recommendations = generate_recommendations(&weak_profile(), 0.4);
        assert_eq!(
            recommendations,
            vec![
                Recommendation::AcademicExcellence,
                Recommendation::BacklogClearance,
                Recommendation::PythonFundamentals,
                Recommendation::SqlDatabases,
                Recommendation::InternshipWorkshop,
                Recommendation::CommunicationMastery,
                Recommendation::AptitudeTraining,
                Recommendation::DataStructuresAlgorithms,
            ]
        );
    }

    #[test]
    fn probability_gates_skill_recommendations() {
        let profile = weak_profile();
        let low = generate_recommendations(&profile, 0.2);
        assert!(!low.contains(&Recommendation::PythonFundamentals));
        assert!(!low.contains(&Recommendation::MachineLearningBasics));

        let high = generate_recommendations(&profile, 0.65);
        assert!(high.contains(&Recommendation::PythonFundamentals));
        assert!(high.contains(&Recommendation::MachineLearningBasics));
    }

    #[test]
    fn advanced_tracks_need_high_probability() {
        let profile = strong_profile();
        assert_eq!(
            generate_recommendations(&profile, 0.9),
            vec![
                Recommendation::AwsCloudPractitioner,
                Recommendation::AdvancedFullStack,
            ]
        );
        assert!(generate_recommendations(&profile, 0.7).is_empty());
    }

    #[test]
    fn recommendations_are_unique_and_ordered() {
        let order = |r: &Recommendation| {
            Recommendation::ALL
                .iter()
                .position(|candidate| candidate == r)
                .unwrap()
        };
        let mut everything = weak_profile();
        everything.skills = ["Cloud Computing", "Web Development"]
            .into_iter()
            .map(String::from)
            .collect();

        for prob in [0.0, 0.31, 0.61, 0.71, 1.0] {
            let recommendations = generate_recommendations(&everything, prob);
            let positions: Vec<usize> = recommendations.iter().map(order).collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn strong_profile_has_no_gaps() {
        assert!(analyze_skill_gaps(&strong_profile()).is_empty());
    }

    #[test]
    fn weak_profile_reports_every_gap() {
        let gaps: Vec<String> = analyze_skill_gaps(&weak_profile())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            gaps,
            vec![
                "Missing Python skills",
                "Missing SQL skills",
                "Missing Web Development skills",
                "No internship experience",
                "Insufficient project portfolio",
                "CGPA below competitive threshold",
                "Multiple backlogs affecting prospects",
                "Communication skills need improvement",
            ]
        );
    }

    #[test]
    fn gap_thresholds_are_inclusive_at_the_boundary() {
        let mut profile = strong_profile();
        profile.cgpa = 7.0;
        profile.backlogs = 2;
        profile.projects = 3;
        profile.internships = 1;
        profile.communication_skills = 6;
        assert!(analyze_skill_gaps(&profile).is_empty());

        profile.communication_skills = 5;
        assert_eq!(analyze_skill_gaps(&profile), vec![SkillGap::WeakCommunication]);
    }

    #[test]
    fn gap_and_recommendation_analysis_is_repeatable() {
        let profile = weak_profile();
        assert_eq!(analyze_skill_gaps(&profile), analyze_skill_gaps(&profile));
        assert_eq!(
            generate_recommendations(&profile, 0.5),
            generate_recommendations(&profile, 0.5)
        );
    }

    #[test]
    fn strong_profile_end_to_end() {
        let result = predict(&strong_profile(), &mut NoJitter);
        assert!(result.skill_gaps.is_empty());
        assert!(result.placement_probability > 0.7);
        assert_eq!(result.placement_prediction, 1);
        assert!(result.expected_salary > 10.0);
        for missing in [
            Recommendation::PythonFundamentals,
            Recommendation::SqlDatabases,
            Recommendation::MachineLearningBasics,
        ] {
            assert!(!result.recommendations.contains(&missing));
        }
    }

    #[test]
    fn prediction_flag_tracks_probability() {
        let sunk = predict(&strong_profile(), &mut Fixed(-1.0));
        assert_eq!(sunk.placement_probability, 0.0);
        assert_eq!(sunk.placement_prediction, 0);

        let weak = predict(&weak_profile(), &mut NoJitter);
        assert!(weak.placement_probability < 0.5);
        assert_eq!(weak.placement_prediction, 0);
    }

    #[test]
    fn factor_impacts_are_capped() {
        let impacts = factor_impacts(&strong_profile());
        let values: Vec<f64> = impacts.iter().map(|i| i.impact).collect();
        assert_eq!(values, vec![25.0, 15.0, 10.0, 13.5, 10.0]);
    }

    #[test]
    fn skill_profile_covers_radar_axes() {
        let view = skill_profile(&strong_profile());
        let factors: Vec<&str> = view.iter().map(|d| d.factor).collect();
        assert_eq!(
            factors,
            vec!["Technical", "Communication", "Problem Solving", "Experience", "Academic"]
        );
        let values: Vec<f64> = view.iter().map(|d| d.impact).collect();
        assert_eq!(values, vec![100.0, 90.0, 80.0, 100.0, 90.0]);

        let weak = skill_profile(&weak_profile());
        assert_eq!(weak[3].impact, 10.0);
        assert_eq!(weak[4].impact, 62.0);
    }

    #[test]
    fn role_fit_scores_each_required_skill() {
        let catalog = crate::catalog::Catalog::builtin().unwrap();
        let role = catalog.role("data-scientist").unwrap();
        let fit = role_fit(&strong_profile(), role);

        assert_eq!(fit.role_id, "data-scientist");
        assert_eq!(fit.skills.len(), role.required_skills.len());
        let scores: Vec<(&str, u32)> = fit
            .skills
            .iter()
            .map(|s| (s.skill.as_str(), s.proficiency))
            .collect();
        assert_eq!(
            scores,
            vec![
                ("Python Programming", 70),
                ("Machine Learning", 0),
                ("Data Science", 0),
                ("SQL & Databases", 70),
                ("Statistics & Mathematics", 0),
                ("Data Visualization", 0),
                ("Problem Solving", 80),
                ("Communication Skills", 90),
            ]
        );
        assert_eq!(fit.skills[0].importance, crate::models::Importance::Critical);
    }

    #[test]
    fn proficiency_uses_short_skill_names() {
        let mut profile = weak_profile();
        assert_eq!(skill_proficiency(&profile, "Machine Learning"), 0);
        assert_eq!(skill_proficiency(&profile, "Communication Skills"), 40);

        profile.skills.insert("ML".to_string());
        profile.skills.insert("React".to_string());
        assert_eq!(skill_proficiency(&profile, "Machine Learning"), 70);
        assert_eq!(skill_proficiency(&profile, "React.js"), 70);
        assert_eq!(skill_proficiency(&profile, "Java Programming"), 0);
    }
}
