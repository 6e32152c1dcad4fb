//! End-to-end generation: copy the template, fill it, share it.

use crate::editing::DocumentId;
use crate::error::PipelineError;
use crate::io::{DocumentFiles, DocumentStore, Role};
use crate::models::ResumeRecord;
use crate::pipeline::{Pipeline, PipelineInput, PipelineReport};

pub const DEFAULT_TITLE_TEMPLATE: &str = "{name} - Resume";

/// What to generate from which template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub template: DocumentId,
    pub title: String,
    /// Principal and role to grant on the finished document
    pub share: Option<(String, Role)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub document: DocumentId,
    /// Where a reader can open the document
    pub location: String,
    pub report: PipelineReport,
}

/// Expand `{name}` in a title template, falling back to "Untitled"
pub fn title_for(template: &str, record: &ResumeRecord) -> String {
    let name = record.name.trim();
    let name = if name.is_empty() { "Untitled" } else { name };
    template.replace("{name}", name)
}

/// Copy the template, run the pipeline on the copy and share the result
pub fn generate<S, F>(
    pipeline: &Pipeline<S>,
    files: &F,
    record: &ResumeRecord,
    request: &GenerateRequest,
) -> Result<Generated, PipelineError>
where
    S: DocumentStore,
    F: DocumentFiles + ?Sized,
{
    let document = files
        .copy(&request.template, &request.title)
        .map_err(|source| PipelineError::Copy {
            template: request.template.clone(),
            source,
        })?;
    log::info!("copied template {} to {document}", request.template);

    let report = pipeline.run(&document, &PipelineInput::from_record(record))?;
    for anomaly in &report.anomalies {
        log::warn!("{document}: {anomaly}");
    }

    if let Some((principal, role)) = &request.share {
        files
            .share(&document, principal, *role)
            .map_err(|source| PipelineError::Share {
                document: document.clone(),
                source,
            })?;
        log::info!("shared {document} with {principal} as {}", role.as_str());
    }

    Ok(Generated {
        location: files.location(&document),
        document,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::LocalStore;
    use crate::pipeline::PipelineOptions;
    use crate::tests::{TEMPLATE, sample_record};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_for() {
        let mut record = sample_record();
        assert_eq!(title_for(DEFAULT_TITLE_TEMPLATE, &record), "Ada Lovelace - Resume");
        record.name = "  ".to_string();
        assert_eq!(title_for("CV of {name}", &record), "CV of Untitled");
    }

    #[test]
    fn test_generate_copies_fills_and_shares() {
        let store = LocalStore::new();
        let template = store.insert("template", TEMPLATE);
        let pipeline = Pipeline::new(&store, PipelineOptions::unthrottled());
        let request = GenerateRequest {
            template: template.clone(),
            title: "Ada".to_string(),
            share: Some(("ada@example.com".to_string(), Role::Writer)),
        };

        let generated = generate(&pipeline, &store, &sample_record(), &request).unwrap();

        assert_ne!(generated.document, template);
        assert_eq!(generated.location, format!("local://{}", generated.document));
        assert_eq!(
            store.grants(),
            vec![(generated.document.clone(), "ada@example.com".to_string(), Role::Writer)]
        );
        // the template itself is untouched
        assert_eq!(store.version(&template), Some(0));
        assert!(!store.text(&generated.document).unwrap().contains("{{"));
    }

    #[test]
    fn test_missing_template_is_copy_error() {
        let store = LocalStore::new();
        let pipeline = Pipeline::new(&store, PipelineOptions::unthrottled());
        let request = GenerateRequest {
            template: DocumentId::new("nope"),
            title: "x".to_string(),
            share: None,
        };

        let result = generate(&pipeline, &store, &sample_record(), &request);

        assert!(matches!(result, Err(PipelineError::Copy { .. })));
        assert!(store.grants().is_empty());
    }
}
