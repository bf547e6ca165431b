use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub location: String,
    pub bio: String,
    /// ASCII art shown as the welcome banner.
    pub banner: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: u8,
    pub category: String,
}

impl Skill {
    /// Number of filled cells on a 10-cell bar.
    pub fn filled_cells(&self) -> usize {
        (self.level.min(100) / 10) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    Complete,
    Beta,
    InDevelopment,
    Other(String),
}

impl From<String> for ProjectStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Complete" => Self::Complete,
            "Beta" => Self::Beta,
            "In Development" => Self::InDevelopment,
            _ => Self::Other(value),
        }
    }
}

impl From<ProjectStatus> for String {
    fn from(value: ProjectStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "Complete"),
            Self::Beta => write!(f, "Beta"),
            Self::InDevelopment => write!(f, "In Development"),
            Self::Other(label) => write!(f, "{label}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub tech: Vec<String>,
    #[serde(default)]
    pub links: Vec<ProjectLink>,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLink {
    pub label: String,
    /// Text shown in place of the raw URL.
    pub display: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    #[serde(default)]
    pub links: Vec<ContactLink>,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub name: String,
    #[serde(flatten)]
    pub colors: ThemeColors,
}

/// Read-only portfolio data handed to the shell at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStore {
    pub profile: Profile,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub contact: ContactInfo,
    pub themes: Vec<ThemePalette>,
}

impl ContentStore {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let store: Self = serde_json::from_str(raw)?;
        if store.themes.is_empty() {
            anyhow::bail!("content must declare at least one theme");
        }
        if let Some(skill) = store.skills.iter().find(|skill| skill.level > 100) {
            anyhow::bail!(
                "skill '{}' has level {}, expected 0-100",
                skill.name,
                skill.level
            );
        }
        Ok(store)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read content file {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("invalid content file {}", path.display()))
    }

    pub fn theme(&self, name: &str) -> Option<&ThemeColors> {
        self.themes
            .iter()
            .find(|palette| palette.name == name)
            .map(|palette| &palette.colors)
    }

    pub fn has_theme(&self, name: &str) -> bool {
        self.theme(name).is_some()
    }

    pub fn theme_names(&self) -> Vec<String> {
        self.themes.iter().map(|palette| palette.name.clone()).collect()
    }

    /// Skills grouped by category, categories in first-seen order.
    pub fn skill_categories(&self) -> Vec<(&str, Vec<&Skill>)> {
        let mut groups: Vec<(&str, Vec<&Skill>)> = Vec::new();
        for skill in &self.skills {
            match groups
                .iter_mut()
                .find(|(category, _)| *category == skill.category)
            {
                Some((_, members)) => members.push(skill),
                None => groups.push((skill.category.as_str(), vec![skill])),
            }
        }
        groups
    }

    /// Login-style name: lowercased with spaces removed.
    pub fn username(&self) -> String {
        self.profile
            .name
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    /// Lowercased first word of the profile name, used in the prompt.
    pub fn prompt_user(&self) -> String {
        self.profile
            .name
            .split_whitespace()
            .next()
            .unwrap_or("guest")
            .to_lowercase()
    }

    pub fn builtin() -> Self {
        Self {
            profile: Profile {
                name: "Alex Developer".to_string(),
                title: "Full Stack Developer".to_string(),
                location: "San Francisco, CA".to_string(),
                bio: "Passionate full-stack developer with 5+ years of experience building modern web applications. Specialized in React, Node.js, and cloud technologies. Love creating clean, efficient code and solving complex problems.".to_string(),
                banner: [
                    r"    _    _     _____  __  __",
                    r"   / \  | |   | ____| \ \/ /",
                    r"  / _ \ | |   |  _|    \  / ",
                    r" / ___ \| |___| |___   /  \ ",
                    r"/_/   \_\_____|_____| /_/\_\",
                ]
                .join("\n"),
                highlights: vec![
                    "5+ years of development experience".to_string(),
                    "Full-stack web development specialist".to_string(),
                    "Passionate about clean code and problem-solving".to_string(),
                    "Always learning new technologies".to_string(),
                ],
            },
            skills: [
                ("JavaScript", 95, "Programming"),
                ("React", 90, "Frontend"),
                ("Node.js", 85, "Backend"),
                ("Python", 80, "Programming"),
                ("TypeScript", 85, "Programming"),
                ("HTML/CSS", 95, "Frontend"),
                ("MongoDB", 75, "Database"),
                ("PostgreSQL", 80, "Database"),
                ("AWS", 70, "Cloud"),
                ("Docker", 75, "DevOps"),
                ("Git", 90, "Tools"),
            ]
            .into_iter()
            .map(|(name, level, category)| Skill {
                name: name.to_string(),
                level,
                category: category.to_string(),
            })
            .collect(),
            projects: vec![
                builtin_project(
                    "E-Commerce Platform",
                    "Full-stack e-commerce solution with React frontend and Node.js backend",
                    &["React", "Node.js", "MongoDB", "Stripe API"],
                    "https://github.com/user/ecommerce-platform",
                    "https://demo-ecommerce.com",
                    ProjectStatus::Complete,
                ),
                builtin_project(
                    "Task Management App",
                    "Real-time collaborative task management tool with drag-and-drop interface",
                    &["Vue.js", "Express.js", "Socket.io", "PostgreSQL"],
                    "https://github.com/user/task-manager",
                    "https://task-app-demo.com",
                    ProjectStatus::InDevelopment,
                ),
                builtin_project(
                    "Weather Dashboard",
                    "Interactive weather dashboard with data visualization and forecasting",
                    &["React", "D3.js", "Weather APIs", "CSS Grid"],
                    "https://github.com/user/weather-dashboard",
                    "https://weather-dash.com",
                    ProjectStatus::Complete,
                ),
                builtin_project(
                    "AI Chat Bot",
                    "Intelligent chatbot with natural language processing capabilities",
                    &["Python", "TensorFlow", "Flask", "NLP"],
                    "https://github.com/user/ai-chatbot",
                    "https://chatbot-demo.com",
                    ProjectStatus::Beta,
                ),
            ],
            contact: ContactInfo {
                email: "alexdev@example.com".to_string(),
                links: [
                    ("GitHub", "https://github.com/alexdev", "https://github.com/alexdev"),
                    (
                        "LinkedIn",
                        "linkedin.com/in/alexdeveloper",
                        "https://linkedin.com/in/alexdeveloper",
                    ),
                    ("Twitter", "@alexcodes", "https://twitter.com/alexcodes"),
                    ("Website", "https://alexdeveloper.com", "https://alexdeveloper.com"),
                ]
                .into_iter()
                .map(|(label, display, url)| ContactLink {
                    label: label.to_string(),
                    display: display.to_string(),
                    url: url.to_string(),
                })
                .collect(),
                location: "San Francisco, CA".to_string(),
            },
            themes: [
                ("green", "#00ff00", "#008800", "#44ff44"),
                ("amber", "#ffb000", "#cc8800", "#ffcc44"),
                ("blue", "#0088ff", "#0066cc", "#44aaff"),
                ("matrix", "#00ff41", "#008f11", "#44ff77"),
                ("cyberpunk", "#ff0080", "#cc0066", "#ff44aa"),
            ]
            .into_iter()
            .map(|(name, primary, secondary, accent)| ThemePalette {
                name: name.to_string(),
                colors: ThemeColors {
                    primary: primary.to_string(),
                    secondary: secondary.to_string(),
                    accent: accent.to_string(),
                },
            })
            .collect(),
        }
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_project(
    name: &str,
    description: &str,
    tech: &[&str],
    github: &str,
    demo: &str,
    status: ProjectStatus,
) -> Project {
    Project {
        name: name.to_string(),
        description: description.to_string(),
        tech: tech.iter().map(ToString::to_string).collect(),
        links: vec![
            ProjectLink {
                label: "GitHub".to_string(),
                url: github.to_string(),
            },
            ProjectLink {
                label: "Live Demo".to_string(),
                url: demo.to_string(),
            },
        ],
        status,
    }
}
