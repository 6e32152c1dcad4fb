use serde::{Deserialize, Serialize};

use crate::editing::{Revision, Span};

/// Character styling applied by `ApplyStyle`.
///
/// Only the flags set to `true` are written; unset flags leave the existing
/// style alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextStyle {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    /// Names of the flags this style sets, as used in a field mask
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.bold {
            fields.push("bold");
        }
        if self.italic {
            fields.push("italic");
        }
        if self.underline {
            fields.push("underline");
        }
        fields
    }
}

/// A single edit sent to a document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditRequest {
    /// Replace every occurrence of `match_text` with `replacement`
    ReplaceText {
        match_text: String,
        replacement: String,
        match_case: bool,
    },
    /// Delete an absolute range
    DeleteRange { span: Span },
    /// Set style flags on an absolute range
    ApplyStyle { span: Span, style: TextStyle },
}

impl EditRequest {
    pub fn replace(match_text: impl Into<String>, replacement: impl Into<String>) -> Self {
        EditRequest::ReplaceText {
            match_text: match_text.into(),
            replacement: replacement.into(),
            match_case: true,
        }
    }

    pub fn delete(span: Span) -> Self {
        EditRequest::DeleteRange { span }
    }

    pub fn bold(span: Span) -> Self {
        EditRequest::ApplyStyle {
            span,
            style: TextStyle::bold(),
        }
    }

    /// The absolute range this request addresses, if any
    pub fn span(&self) -> Option<Span> {
        match self {
            EditRequest::ReplaceText { .. } => None,
            EditRequest::DeleteRange { span } | EditRequest::ApplyStyle { span, .. } => {
                Some(*span)
            }
        }
    }
}

/// An ordered list of requests applied atomically in one remote call.
///
/// Absolute offsets inside the batch refer to the snapshot at `base`.
/// Requests apply sequentially, so a deletion followed by another
/// offset-addressed request must be ordered from the highest offset down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub base: Revision,
    pub requests: Vec<EditRequest>,
}

impl Batch {
    pub fn new(base: Revision, requests: Vec<EditRequest>) -> Self {
        Self { base, requests }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_only_lists_set_flags() {
        assert_eq!(TextStyle::bold().field_names(), vec!["bold"]);
        let all = TextStyle {
            bold: true,
            italic: true,
            underline: true,
        };
        assert_eq!(all.field_names(), vec!["bold", "italic", "underline"]);
        assert!(TextStyle::default().field_names().is_empty());
    }

    #[test]
    fn test_replace_is_case_sensitive() {
        let request = EditRequest::replace("{{name}}", "Ada");
        assert!(matches!(
            request,
            EditRequest::ReplaceText {
                match_case: true,
                ..
            }
        ));
        assert_eq!(request.span(), None);
    }
}
