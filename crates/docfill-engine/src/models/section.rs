use crate::editing::normalize_heading;
use crate::models::ResumeRecord;

/// The declared sections of a template, each introduced by a heading line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Experience,
    Projects,
    Education,
    LanguageSkills,
    TechnicalSkills,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Experience,
        Section::Projects,
        Section::Education,
        Section::LanguageSkills,
        Section::TechnicalSkills,
    ];

    /// Heading text as printed in the template (already normalized)
    pub fn label(self) -> &'static str {
        match self {
            Section::Experience => "EXPERIENCE",
            Section::Projects => "PROJECTS",
            Section::Education => "EDUCATION",
            Section::LanguageSkills => "LANGUAGE SKILLS",
            Section::TechnicalSkills => "TECHNICAL SKILLS",
        }
    }

    /// Section whose label matches `text` after trimming and upper-casing
    pub fn from_label(text: &str) -> Option<Section> {
        let normalized = normalize_heading(text);
        Section::ALL.into_iter().find(|s| s.label() == normalized)
    }

    /// Whether the record has data backing this section
    pub fn is_present(self, record: &ResumeRecord) -> bool {
        match self {
            Section::Experience => !record.experiences.is_empty(),
            Section::Projects => !record.projects.is_empty(),
            Section::Education => !record.education.is_empty(),
            Section::LanguageSkills => !record.language_skills.trim().is_empty(),
            Section::TechnicalSkills => !record.technical_skills.trim().is_empty(),
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether one declared section has backing data in this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDescriptor {
    pub section: Section,
    pub present: bool,
}

impl SectionDescriptor {
    pub fn heading(&self) -> &'static str {
        self.section.label()
    }

    /// One descriptor per declared section, evaluated against `record`
    pub fn for_record(record: &ResumeRecord) -> Vec<SectionDescriptor> {
        Section::ALL
            .into_iter()
            .map(|section| SectionDescriptor {
                section,
                present: section.is_present(record),
            })
            .collect()
    }
}

/// Sections whose headings stay in the document
pub fn retained(descriptors: &[SectionDescriptor]) -> Vec<Section> {
    descriptors
        .iter()
        .filter(|d| d.present)
        .map(|d| d.section)
        .collect()
}

/// Sections to remove from the document
pub fn absent(descriptors: &[SectionDescriptor]) -> Vec<Section> {
    descriptors
        .iter()
        .filter(|d| !d.present)
        .map(|d| d.section)
        .collect()
}
