//! Shared fixtures for unit tests

use crate::editing::{Block, DocumentId, OffsetDocument, OffsetUnit, Revision, Span};
use crate::models::{Education, Experience, ResumeRecord};

/// Template covering every declared section
pub const TEMPLATE: &str = "\
{{name}}
{{email}} | {{phone}} | {{location}}
{{links}}

EXPERIENCE
{{company_1}} {{company_location_1}}
{{job_title_1}} {{job_dates_1}}
- {{experience_point_1_1}}
- {{experience_point_1_2}}
- {{experience_point_1_3}}

PROJECTS
{{project_name_1}} {{project_dates_1}}
{{project_technologies_1}}
- {{project_point_1_1}}
- {{project_point_1_2}}

EDUCATION
{{school_1}} {{school_location_1}}
{{degree_1}} {{graduation_date_1}}

LANGUAGE SKILLS
{{language_skills}}

TECHNICAL SKILLS
{{technical_skills}}
";

/// A record with one job, no projects and no technical skills
pub fn sample_record() -> ResumeRecord {
    ResumeRecord {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "+44 20 7946 0000".to_string(),
        location: "London".to_string(),
        links: vec!["github.com/ada".to_string()],
        experiences: vec![Experience {
            company: "Analytical Engines Ltd".to_string(),
            location: "London".to_string(),
            title: "Engineer".to_string(),
            dates: "1842 - 1843".to_string(),
            points: vec![
                "Wrote the **first program** for the engine".to_string(),
                "Published notes".to_string(),
            ],
        }],
        projects: vec![],
        education: vec![Education {
            school: "University of London".to_string(),
            location: "London".to_string(),
            degree: "Mathematics".to_string(),
            graduation_date: "1835".to_string(),
        }],
        language_skills: "English, French".to_string(),
        technical_skills: String::new(),
    }
}

/// Snapshot laid out the way `LocalStore` reads one: every line becomes a
/// `\n`-terminated block with byte offsets and a single unstyled run
pub fn snapshot_from_lines(lines: &[&str]) -> OffsetDocument {
    let mut offset = 0;
    let blocks = lines
        .iter()
        .map(|line| {
            let text = format!("{line}\n");
            let span = Span::new(offset, offset + text.len());
            offset = span.end;
            Block::plain(span, text)
        })
        .collect();

    OffsetDocument {
        id: DocumentId::new("test"),
        revision: Revision("0".to_string()),
        unit: OffsetUnit::Utf8Bytes,
        blocks,
    }
}
