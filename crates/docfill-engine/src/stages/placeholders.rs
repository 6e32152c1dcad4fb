use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::editing::markers::strip_bold;
use crate::editing::{EditRequest, OffsetDocument, REMOVAL_MARKER};
use crate::models::FlattenedFields;
use crate::models::fields::SlotKind;
use crate::stages::{Stage, StageKind, Step};

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("Invalid placeholder regex"))
}

/// Distinct placeholder names appearing in `text`, sorted
pub fn placeholder_names(text: &str) -> BTreeSet<String> {
    placeholder_regex()
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// The text a `{{name}}` token is replaced with
pub fn resolve(fields: &FlattenedFields, name: &str) -> String {
    let value = fields.get(name).unwrap_or_default();
    match SlotKind::of(name) {
        SlotKind::Bullet if value.trim().is_empty() => REMOVAL_MARKER.to_string(),
        SlotKind::Skills => value.to_string(),
        _ => strip_bold(value),
    }
}

/// Substitutes every `{{name}}` token in one batch
#[derive(Debug)]
pub struct PlaceholderResolver<'a> {
    fields: &'a FlattenedFields,
    done: bool,
}

impl<'a> PlaceholderResolver<'a> {
    pub fn new(fields: &'a FlattenedFields) -> Self {
        Self {
            fields,
            done: false,
        }
    }
}

impl Stage for PlaceholderResolver<'_> {
    fn kind(&self) -> StageKind {
        StageKind::PlaceholderResolver
    }

    fn next(&mut self, doc: &OffsetDocument) -> Step {
        if self.done {
            return Step::Done;
        }
        self.done = true;

        let names = placeholder_names(&doc.text());
        if names.is_empty() {
            log::info!("no placeholders in document");
            return Step::Done;
        }

        let requests: Vec<EditRequest> = names
            .iter()
            .map(|name| {
                if self.fields.get(name).is_none() {
                    log::debug!("no value for placeholder {name}, substituting empty text");
                }
                EditRequest::replace(format!("{{{{{name}}}}}"), resolve(self.fields, name))
            })
            .collect();
        log::info!("resolving {} distinct placeholders", requests.len());
        Step::Apply(requests)
    }
}
