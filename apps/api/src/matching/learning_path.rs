//! Learning paths: curated resources for a candidate's missing skills.

use serde::{Deserialize, Serialize};

use crate::matching::Skill;

/// Max resources suggested per skill.
const RESOURCES_PER_SKILL: usize = 3;
/// Resources kept when level filtering leaves nothing.
const FALLBACK_RESOURCES: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    /// Suitable for every learner; only used on resources.
    All,
}

impl Level {
    /// Resource levels a learner at `self` should be shown.
    fn accepts(self, resource: Level) -> bool {
        match self {
            Level::Beginner => matches!(resource, Level::Beginner | Level::All),
            Level::Intermediate => {
                matches!(resource, Level::Beginner | Level::Intermediate | Level::All)
            }
            Level::Advanced | Level::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Book,
    Course,
    Docs,
    Tutorials,
    Platform,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningResource {
    pub title: &'static str,
    pub kind: ResourceKind,
    pub level: Level,
    pub duration_hours: u32,
    pub url: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillPlan {
    pub skill: Skill,
    pub resources: Vec<LearningResource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningPath {
    pub plan: Vec<SkillPlan>,
    pub total_hours: u32,
    pub missing_skills: Vec<Skill>,
}

const fn resource(
    title: &'static str,
    kind: ResourceKind,
    level: Level,
    duration_hours: u32,
    url: &'static str,
) -> LearningResource {
    LearningResource {
        title,
        kind,
        level,
        duration_hours,
        url,
    }
}

const PYTHON: &[LearningResource] = &[
    resource("Python Crash Course", ResourceKind::Book, Level::Beginner, 30, "https://nostarch.com/pythoncrashcourse"),
    resource("Automate the Boring Stuff", ResourceKind::Course, Level::Beginner, 25, "https://automatetheboringstuff.com"),
    resource("Python Data Science Handbook", ResourceKind::Book, Level::Intermediate, 40, "https://jakevdp.github.io/PythonDataScienceHandbook/"),
    resource("Fluent Python", ResourceKind::Book, Level::Advanced, 50, "https://www.oreilly.com/library/view/fluent-python-2nd/9781492056348/"),
    resource("Real Python Tutorials", ResourceKind::Tutorials, Level::All, 100, "https://realpython.com"),
];

const AWS: &[LearningResource] = &[
    resource("AWS Cloud Practitioner Essentials", ResourceKind::Course, Level::Beginner, 15, "https://aws.amazon.com/training/digital/"),
    resource("AWS Solutions Architect Associate", ResourceKind::Course, Level::Intermediate, 40, "https://aws.amazon.com/certification/certified-solutions-architect-associate/"),
    resource("AWS Developer Guide", ResourceKind::Docs, Level::Intermediate, 30, "https://docs.aws.amazon.com"),
];

const MACHINE_LEARNING: &[LearningResource] = &[
    resource("Hands-On Machine Learning with Scikit-Learn", ResourceKind::Book, Level::Beginner, 35, "https://www.oreilly.com/library/view/hands-on-machine-learning/9781492032632/"),
    resource("Fast.ai Practical Deep Learning", ResourceKind::Course, Level::Intermediate, 60, "https://course.fast.ai"),
    resource("Andrew Ng Machine Learning Course", ResourceKind::Course, Level::Beginner, 55, "https://www.coursera.org/learn/machine-learning"),
];

const DATA_ANALYSIS: &[LearningResource] = &[
    resource("Python for Data Analysis", ResourceKind::Book, Level::Beginner, 30, "https://www.oreilly.com/library/view/python-for-data/9781491957653/"),
    resource("Data Science from Scratch", ResourceKind::Book, Level::Intermediate, 40, "https://www.oreilly.com/library/view/data-science-from/9781492041122/"),
];

const DEFAULT: &[LearningResource] = &[
    resource("LinkedIn Learning", ResourceKind::Platform, Level::Beginner, 20, "https://www.linkedin.com/learning/"),
    resource("Coursera Professional Development", ResourceKind::Course, Level::Beginner, 30, "https://www.coursera.org/"),
    resource("Udemy Online Courses", ResourceKind::Platform, Level::All, 40, "https://www.udemy.com/"),
];

fn catalog(skill: &str) -> &'static [LearningResource] {
    match skill {
        "python" => PYTHON,
        "aws" => AWS,
        "machine learning" => MACHINE_LEARNING,
        "data analysis" => DATA_ANALYSIS,
        _ => DEFAULT,
    }
}

/// Builds a learning path for already-normalized `missing_skills`.
pub fn generate_learning_path(missing_skills: &[Skill], level: Level) -> LearningPath {
    let plan: Vec<SkillPlan> = missing_skills
        .iter()
        .map(|skill| {
            let available = catalog(skill);
            let filtered: Vec<LearningResource> = available
                .iter()
                .filter(|r| level.accepts(r.level))
                .cloned()
                .collect();
            let resources = if filtered.is_empty() {
                available.iter().take(FALLBACK_RESOURCES).cloned().collect()
            } else {
                filtered.into_iter().take(RESOURCES_PER_SKILL).collect()
            };
            SkillPlan {
                skill: skill.clone(),
                resources,
            }
        })
        .collect();

    let total_hours = plan
        .iter()
        .flat_map(|p| p.resources.iter())
        .map(|r| r.duration_hours)
        .sum();

    LearningPath {
        plan,
        total_hours,
        missing_skills: missing_skills.to_vec(),
    }
}
