use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::models::{CareerRole, Course, Recommendation, RoleCategory};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseGroup {
    pub group: String,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleOrder {
    Catalog,
    Demand,
    Growth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    roles: Vec<CareerRole>,
    course_groups: Vec<CourseGroup>,
}

impl Catalog {
    pub fn builtin() -> anyhow::Result<Self> {
        serde_json::from_str(BUILTIN_CATALOG).context("built-in catalog is malformed")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse catalog {}", path.display()))
    }

    pub fn all_roles(&self) -> &[CareerRole] {
        &self.roles
    }

    pub fn role(&self, id: &str) -> Option<&CareerRole> {
        self.roles.iter().find(|role| role.id == id)
    }

    pub fn roles_by_demand(&self) -> Vec<&CareerRole> {
        let mut roles: Vec<&CareerRole> = self.roles.iter().collect();
        roles.sort_by(|a, b| b.job_market_demand.cmp(&a.job_market_demand));
        roles
    }

    pub fn roles_by_growth(&self) -> Vec<&CareerRole> {
        let mut roles: Vec<&CareerRole> = self.roles.iter().collect();
        roles.sort_by(|a, b| b.growth_potential.cmp(&a.growth_potential));
        roles
    }

    pub fn list_roles(&self, order: RoleOrder, category: Option<RoleCategory>) -> Vec<&CareerRole> {
        let roles = match order {
            RoleOrder::Catalog => self.roles.iter().collect(),
            RoleOrder::Demand => self.roles_by_demand(),
            RoleOrder::Growth => self.roles_by_growth(),
        };

        roles
            .into_iter()
            .filter(|role| category.map_or(true, |c| role.category == c))
            .collect()
    }

    pub fn course_group(&self, key: &str) -> &[Course] {
        self.course_groups
            .iter()
            .find(|group| group.group == key)
            .map(|group| group.courses.as_slice())
            .unwrap_or(&[])
    }

    /// Courses backing a recommendation label. Unknown labels are tried as a group key.
    pub fn courses_for_recommendation(&self, label: &str) -> &[Course] {
        let key = Recommendation::from_label(label)
            .map(Recommendation::course_group)
            .unwrap_or(label);
        self.course_group(key)
    }

    pub fn courses_by_category(&self) -> Vec<(String, Vec<Course>)> {
        let mut grouped: Vec<(String, Vec<Course>)> = Vec::new();

        for course in self.course_groups.iter().flat_map(|group| group.courses.iter()) {
            match grouped.iter_mut().find(|(category, _)| *category == course.category) {
                Some((_, courses)) => courses.push(course.clone()),
                None => grouped.push((course.category.clone(), vec![course.clone()])),
            }
        }

        grouped
    }

    pub fn course_group_count(&self) -> usize {
        self.course_groups.len()
    }
}
