use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollegeTier {
    Tier1,
    Tier2,
    Tier3,
}

impl CollegeTier {
    pub fn salary_bonus(self) -> f64 {
        match self {
            CollegeTier::Tier1 => 2.0,
            CollegeTier::Tier2 => 1.0,
            CollegeTier::Tier3 => 0.0,
        }
    }
}

/// One submitted student profile. Values are taken as given; nothing is range checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub cgpa: f64,
    pub college_tier: CollegeTier,
    pub backlogs: u32,
    pub current_backlogs: u32,
    pub internships: u32,
    pub projects: u32,
    pub certifications: u32,
    #[serde(alias = "hackathomsWon")]
    pub hackathons_won: u32,
    pub extracurricular: u32,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    pub communication_skills: u32,
    pub problem_solving: u32,
    pub teamwork: u32,
    pub leadership: u32,
    pub time_management: u32,
    pub aptitude_score: u32,
    pub coding_score: u32,
}

impl StudentProfile {
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Recommendation {
    AcademicExcellence,
    BacklogClearance,
    PythonFundamentals,
    SqlDatabases,
    MachineLearningBasics,
    InternshipWorkshop,
    CommunicationMastery,
    AptitudeTraining,
    DataStructuresAlgorithms,
    AwsCloudPractitioner,
    AdvancedFullStack,
}

impl Recommendation {
    pub const ALL: [Recommendation; 11] = [
        Recommendation::AcademicExcellence,
        Recommendation::BacklogClearance,
        Recommendation::PythonFundamentals,
        Recommendation::SqlDatabases,
        Recommendation::MachineLearningBasics,
        Recommendation::InternshipWorkshop,
        Recommendation::CommunicationMastery,
        Recommendation::AptitudeTraining,
        Recommendation::DataStructuresAlgorithms,
        Recommendation::AwsCloudPractitioner,
        Recommendation::AdvancedFullStack,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Recommendation::AcademicExcellence => "📚 Academic Excellence Program",
            Recommendation::BacklogClearance => "⏰ Backlog Clearance Strategy",
            Recommendation::PythonFundamentals => "🐍 Python Programming Fundamentals",
            Recommendation::SqlDatabases => "🗄️ Database Management with SQL",
            Recommendation::MachineLearningBasics => "🤖 Machine Learning Basics",
            Recommendation::InternshipWorkshop => "💼 Internship Preparation Workshop",
            Recommendation::CommunicationMastery => "🎤 Communication Skills Mastery",
            Recommendation::AptitudeTraining => "🧠 Quantitative Aptitude Training",
            Recommendation::DataStructuresAlgorithms => "⚡ Data Structures & Algorithms",
            Recommendation::AwsCloudPractitioner => "☁️ AWS Cloud Practitioner",
            Recommendation::AdvancedFullStack => "🌐 Advanced Full Stack Development",
        }
    }

    pub fn course_group(self) -> &'static str {
        match self {
            Recommendation::AcademicExcellence => "Python Programming",
            Recommendation::BacklogClearance => "Aptitude & Reasoning",
            Recommendation::PythonFundamentals => "Python Programming",
            Recommendation::SqlDatabases => "SQL & Databases",
            Recommendation::MachineLearningBasics => "Machine Learning",
            Recommendation::InternshipWorkshop => "Internship Preparation",
            Recommendation::CommunicationMastery => "Communication Skills",
            Recommendation::AptitudeTraining => "Aptitude & Reasoning",
            Recommendation::DataStructuresAlgorithms => "Data Structures & Algorithms",
            Recommendation::AwsCloudPractitioner => "Cloud Computing",
            Recommendation::AdvancedFullStack => "Web Development",
        }
    }

    pub fn from_label(label: &str) -> Option<Recommendation> {
        Recommendation::ALL
            .into_iter()
            .find(|recommendation| recommendation.label() == label)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillGap {
    MissingSkill(&'static str),
    NoInternship,
    ThinPortfolio,
    LowCgpa,
    ManyBacklogs,
    WeakCommunication,
}

impl fmt::Display for SkillGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillGap::MissingSkill(skill) => write!(f, "Missing {skill} skills"),
            SkillGap::NoInternship => f.write_str("No internship experience"),
            SkillGap::ThinPortfolio => f.write_str("Insufficient project portfolio"),
            SkillGap::LowCgpa => f.write_str("CGPA below competitive threshold"),
            SkillGap::ManyBacklogs => f.write_str("Multiple backlogs affecting prospects"),
            SkillGap::WeakCommunication => f.write_str("Communication skills need improvement"),
        }
    }
}

impl Serialize for SkillGap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub placement_probability: f64,
    pub placement_prediction: u8,
    pub expected_salary: f64,
    pub recommendations: Vec<Recommendation>,
    pub skill_gaps: Vec<SkillGap>,
    pub profile: StudentProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactorImpact {
    pub factor: &'static str,
    pub impact: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Importance {
    Critical,
    Important,
    NiceToHave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleCategory {
    Development,
    Data,
    Infrastructure,
    Quality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequirement {
    pub skill: String,
    pub level: SkillLevel,
    pub importance: Importance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillFit {
    pub skill: String,
    pub level: SkillLevel,
    pub importance: Importance,
    pub proficiency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFit {
    pub role_id: String,
    pub title: String,
    pub skills: Vec<SkillFit>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u64,
    pub max: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRole {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: RoleCategory,
    pub salary_range: SalaryRange,
    pub required_skills: Vec<SkillRequirement>,
    pub experience_years_required: u32,
    pub career_progression: Vec<String>,
    pub companies: Vec<String>,
    pub job_market_demand: u8,
    pub growth_potential: u8,
    pub course_recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub name: String,
    #[serde(alias = "company")]
    pub provider: String,
    #[serde(alias = "link")]
    pub url: String,
    pub category: String,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
