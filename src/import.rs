use std::io::Read;
use std::path::Path;

use anyhow::Context;

use crate::models::{CollegeTier, StudentProfile};

#[derive(Debug, Clone)]
pub struct ImportedProfile {
    pub student: String,
    pub profile: StudentProfile,
}

pub fn import_csv(csv_path: &Path) -> anyhow::Result<Vec<ImportedProfile>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    read_profiles(file)
}

/// One profile per row. The `skills` column holds `;`-separated skill names.
pub fn read_profiles<R: Read>(source: R) -> anyhow::Result<Vec<ImportedProfile>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        student: String,
        cgpa: f64,
        college_tier: CollegeTier,
        backlogs: u32,
        current_backlogs: u32,
        internships: u32,
        projects: u32,
        certifications: u32,
        hackathons_won: u32,
        extracurricular: u32,
        skills: String,
        communication_skills: u32,
        problem_solving: u32,
        teamwork: u32,
        leadership: u32,
        time_management: u32,
        aptitude_score: u32,
        coding_score: u32,
    }

    let mut reader = csv::Reader::from_reader(source);
    let mut profiles = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid profile on data row {}", index + 1))?;
        let skills = row
            .skills
            .split(';')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(String::from)
            .collect();

        profiles.push(ImportedProfile {
            student: row.student,
            profile: StudentProfile {
                cgpa: row.cgpa,
                college_tier: row.college_tier,
                backlogs: row.backlogs,
                current_backlogs: row.current_backlogs,
                internships: row.internships,
                projects: row.projects,
                certifications: row.certifications,
                hackathons_won: row.hackathons_won,
                extracurricular: row.extracurricular,
                skills,
                communication_skills: row.communication_skills,
                problem_solving: row.problem_solving,
                teamwork: row.teamwork,
                leadership: row.leadership,
                time_management: row.time_management,
                aptitude_score: row.aptitude_score,
                coding_score: row.coding_score,
            },
        });
    }

    Ok(profiles)
}

pub fn load_profile_json(path: &Path) -> anyhow::Result<StudentProfile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid profile in {}", path.display()))
}
