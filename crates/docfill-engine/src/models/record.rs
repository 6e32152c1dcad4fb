use serde::{Deserialize, Serialize};

/// Structured résumé data used to fill a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub links: Vec<String>,
    pub experiences: Vec<Experience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    /// Free text, printed verbatim
    pub language_skills: String,
    /// Free text, printed verbatim
    pub technical_skills: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub company: String,
    pub location: String,
    pub title: String,
    pub dates: String,
    /// Bullet points; `**text**` marks text to print bold
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub dates: String,
    pub technologies: String,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub school: String,
    pub location: String,
    pub degree: String,
    pub graduation_date: String,
}

impl ResumeRecord {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
