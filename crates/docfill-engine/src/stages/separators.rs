use std::collections::BTreeSet;

use crate::editing::{EditRequest, OffsetDocument};
use crate::stages::{Stage, StageKind, Step};

/// Inserts ` | ` between adjacent field values the template prints side by side
#[derive(Debug)]
pub struct SeparatorFixer {
    pairs: Vec<(String, String)>,
    done: bool,
}

impl SeparatorFixer {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs, done: false }
    }
}

impl Stage for SeparatorFixer {
    fn kind(&self) -> StageKind {
        StageKind::SeparatorFixer
    }

    fn next(&mut self, doc: &OffsetDocument) -> Step {
        if self.done {
            return Step::Done;
        }
        self.done = true;

        let text = doc.text();
        let mut seen = BTreeSet::new();
        let mut requests = Vec::new();
        for (a, b) in &self.pairs {
            let joined = format!("{a} {b}");
            if !text.contains(&joined) {
                log::debug!("separator pair {joined:?} not present, skipping");
                continue;
            }
            if seen.insert(joined.clone()) {
                requests.push(EditRequest::replace(joined, format!("{a} | {b}")));
            }
        }

        if requests.is_empty() {
            Step::Done
        } else {
            log::info!("inserting {} separators", requests.len());
            Step::Apply(requests)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::snapshot_from_lines;
    use pretty_assertions::assert_eq;

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_only_present_pairs_are_fixed() {
        let doc = snapshot_from_lines(&["Acme Corp Berlin", "Engineer 2020 - 2023"]);
        let mut fixer = SeparatorFixer::new(vec![
            pair("Acme Corp", "Berlin"),
            pair("Engineer", "2019"),
            pair("Acme Corp", "Berlin"),
        ]);

        assert_eq!(
            fixer.next(&doc),
            Step::Apply(vec![EditRequest::replace(
                "Acme Corp Berlin",
                "Acme Corp | Berlin"
            )])
        );
        assert_eq!(fixer.next(&doc), Step::Done);
    }

    #[test]
    fn test_already_separated_is_untouched() {
        let doc = snapshot_from_lines(&["Acme Corp | Berlin"]);
        let mut fixer = SeparatorFixer::new(vec![pair("Acme Corp", "Berlin")]);

        assert_eq!(fixer.next(&doc), Step::Done);
    }
}
