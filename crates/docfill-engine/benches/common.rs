// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use docfill_engine::models::{Education, Experience, Project};
use docfill_engine::ResumeRecord;

/// Template with `jobs` experience blocks of `points` bullets each
#[allow(dead_code)]
pub fn generate_template(jobs: usize, points: usize) -> String {
    let mut template = String::from("{{name}}\n{{email}} | {{phone}}\n | \n\nEXPERIENCE\n");
    for job in 1..=jobs {
        template.push_str(&format!(
            "{{{{company_{job}}}}} {{{{company_location_{job}}}}}\n{{{{job_title_{job}}}}} {{{{job_dates_{job}}}}}\n"
        ));
        for point in 1..=points {
            template.push_str(&format!("- {{{{experience_point_{job}_{point}}}}}\n"));
        }
        template.push('\n');
    }
    template.push_str("PROJECTS\n{{project_name_1}} {{project_dates_1}}\n- {{project_point_1_1}}\n\n");
    template.push_str("EDUCATION\n{{school_1}} {{school_location_1}}\n\n");
    template.push_str("TECHNICAL SKILLS\n{{technical_skills}}\n");
    template
}

/// Record filling every job but leaving the last bullet of each empty
#[allow(dead_code)]
pub fn generate_record(jobs: usize, points: usize) -> ResumeRecord {
    ResumeRecord {
        name: "Bench Person".to_string(),
        email: "bench@example.com".to_string(),
        phone: "555 0100".to_string(),
        experiences: (1..=jobs)
            .map(|job| Experience {
                company: format!("Company {job}"),
                location: "Remote".to_string(),
                title: "Engineer".to_string(),
                dates: format!("20{job:02} - 20{:02}", job + 1),
                points: (1..points)
                    .map(|p| format!("Improved **metric {job}.{p}** by a lot"))
                    .collect(),
            })
            .collect(),
        projects: Vec::<Project>::new(),
        education: vec![Education {
            school: "Bench University".to_string(),
            location: "Remote".to_string(),
            ..Education::default()
        }],
        technical_skills: "Rust, **SQL**".to_string(),
        ..ResumeRecord::default()
    }
}
