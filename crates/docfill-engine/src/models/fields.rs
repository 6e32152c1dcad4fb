use std::collections::BTreeMap;

use crate::editing::markers::{bold_to_markers, display_text};
use crate::models::ResumeRecord;

/// How a slot's value is substituted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// One bullet line of an experience or project; empty means "drop the line"
    Bullet,
    /// Free-text skills, substituted verbatim
    Skills,
    /// Everything else
    Plain,
}

impl SlotKind {
    pub fn of(name: &str) -> SlotKind {
        if name.starts_with("experience_point_") || name.starts_with("project_point_") {
            SlotKind::Bullet
        } else if name == "language_skills" || name == "technical_skills" {
            SlotKind::Skills
        } else {
            SlotKind::Plain
        }
    }
}

/// Slot name to value mapping, computed once per run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedFields {
    values: BTreeMap<String, String>,
}

impl FlattenedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a record into named slots (indices are 1-based)
    pub fn from_record(record: &ResumeRecord) -> Self {
        let mut fields = Self::new();
        fields.insert("name", &record.name);
        fields.insert("email", &record.email);
        fields.insert("phone", &record.phone);
        fields.insert("location", &record.location);
        fields.insert("links", record.links.join(" | "));

        for (i, exp) in record.experiences.iter().enumerate() {
            let n = i + 1;
            fields.insert(format!("company_{n}"), &exp.company);
            fields.insert(format!("company_location_{n}"), &exp.location);
            fields.insert(format!("job_title_{n}"), &exp.title);
            fields.insert(format!("job_dates_{n}"), &exp.dates);
            for (j, point) in exp.points.iter().enumerate() {
                fields.insert(format!("experience_point_{n}_{}", j + 1), bold_to_markers(point));
            }
        }

        for (i, project) in record.projects.iter().enumerate() {
            let n = i + 1;
            fields.insert(format!("project_name_{n}"), &project.name);
            fields.insert(format!("project_dates_{n}"), &project.dates);
            fields.insert(format!("project_technologies_{n}"), &project.technologies);
            for (j, point) in project.points.iter().enumerate() {
                fields.insert(format!("project_point_{n}_{}", j + 1), bold_to_markers(point));
            }
        }

        for (i, edu) in record.education.iter().enumerate() {
            let n = i + 1;
            fields.insert(format!("school_{n}"), &edu.school);
            fields.insert(format!("school_location_{n}"), &edu.location);
            fields.insert(format!("degree_{n}"), &edu.degree);
            fields.insert(format!("graduation_date_{n}"), &edu.graduation_date);
        }

        fields.insert("language_skills", &record.language_skills);
        fields.insert("technical_skills", &record.technical_skills);
        fields
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value with marker and bold delimiters removed; empty when missing
    pub fn display(&self, name: &str) -> String {
        self.get(name).map(display_text).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Slot pairs the template prints side by side, in display form, where
    /// both values are non-empty
    pub fn adjacent_pairs(&self) -> Vec<(String, String)> {
        const PAIRS: [(&str, &str); 5] = [
            ("company", "company_location"),
            ("job_title", "job_dates"),
            ("project_name", "project_dates"),
            ("school", "school_location"),
            ("degree", "graduation_date"),
        ];

        let mut pairs = Vec::new();
        for (left, right) in PAIRS {
            for n in 1.. {
                let left_name = format!("{left}_{n}");
                if self.get(&left_name).is_none() {
                    break;
                }
                let a = self.display(&left_name);
                let b = self.display(&format!("{right}_{n}"));
                if !a.trim().is_empty() && !b.trim().is_empty() {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::markers::find_markers;
    use crate::models::{Education, Experience};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("experience_point_1_3", SlotKind::Bullet)]
    #[case("project_point_2_1", SlotKind::Bullet)]
    #[case("technical_skills", SlotKind::Skills)]
    #[case("language_skills", SlotKind::Skills)]
    #[case("company_1", SlotKind::Plain)]
    #[case("name", SlotKind::Plain)]
    fn test_slot_kind(#[case] name: &str, #[case] kind: SlotKind) {
        assert_eq!(SlotKind::of(name), kind);
    }

    fn record() -> ResumeRecord {
        ResumeRecord {
            name: "Ada Lovelace".to_string(),
            links: vec!["github.com/ada".to_string(), "ada.dev".to_string()],
            experiences: vec![Experience {
                company: "Acme".to_string(),
                location: "Remote".to_string(),
                title: "Engineer".to_string(),
                dates: "".to_string(),
                points: vec!["Shipped **v2** early".to_string(), "Led team".to_string()],
            }],
            education: vec![Education {
                school: "Uni".to_string(),
                location: "London".to_string(),
                degree: "BSc".to_string(),
                graduation_date: "2015".to_string(),
            }],
            technical_skills: "Rust | Go | **SQL**".to_string(),
            ..ResumeRecord::default()
        }
    }

    #[test]
    fn test_flatten_indexes_from_one() {
        let fields = FlattenedFields::from_record(&record());

        assert_eq!(fields.get("name"), Some("Ada Lovelace"));
        assert_eq!(fields.get("links"), Some("github.com/ada | ada.dev"));
        assert_eq!(fields.get("company_1"), Some("Acme"));
        assert_eq!(fields.get("experience_point_1_2"), Some("Led team"));
        assert_eq!(fields.get("experience_point_1_3"), None);
        assert_eq!(fields.get("school_location_1"), Some("London"));
    }

    #[test]
    fn test_bullets_carry_marker_spans() {
        let fields = FlattenedFields::from_record(&record());
        let point = fields.get("experience_point_1_1").unwrap();

        let markers = find_markers(point);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].marker.payload, "v2");
        assert_eq!(fields.display("experience_point_1_1"), "Shipped v2 early");
    }

    #[test]
    fn test_skills_are_verbatim() {
        let fields = FlattenedFields::from_record(&record());
        assert_eq!(fields.get("technical_skills"), Some("Rust | Go | **SQL**"));
    }

    #[test]
    fn test_adjacent_pairs_skip_empty_values() {
        let fields = FlattenedFields::from_record(&record());

        assert_eq!(
            fields.adjacent_pairs(),
            vec![
                ("Acme".to_string(), "Remote".to_string()),
                ("Uni".to_string(), "London".to_string()),
                ("BSc".to_string(), "2015".to_string()),
            ]
        );
    }
}
