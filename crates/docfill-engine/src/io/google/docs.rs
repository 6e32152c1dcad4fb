//! Google Docs REST store: `documents.get` and `documents.batchUpdate`.

use serde::{Deserialize, Serialize};

use crate::editing::{
    Batch, Block, DocumentId, EditRequest, OffsetDocument, OffsetUnit, Revision, Span, TextRun,
};
use crate::io::google::{check_status, http_client};
use crate::io::{AccessToken, DocumentStore, StoreError};

pub const DEFAULT_DOCS_BASE_URL: &str = "https://docs.googleapis.com/v1";

/// `DocumentStore` backed by the Google Docs API
#[derive(Debug, Clone)]
pub struct GoogleDocsStore {
    http: reqwest::blocking::Client,
    token: AccessToken,
    base_url: String,
}

impl GoogleDocsStore {
    pub fn new(token: AccessToken) -> Result<Self, StoreError> {
        Self::with_base_url(token, DEFAULT_DOCS_BASE_URL)
    }

    pub fn with_base_url(token: AccessToken, base_url: impl Into<String>) -> Result<Self, StoreError> {
        Ok(Self {
            http: http_client()?,
            token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl DocumentStore for GoogleDocsStore {
    fn get(&self, id: &DocumentId) -> Result<OffsetDocument, StoreError> {
        let url = format!("{}/documents/{}", self.base_url, id);
        log::debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.token.secret())
            .send()?;
        let body = check_status(response)?.text()?;
        let wire: WireDocument = serde_json::from_str(&body)?;
        Ok(snapshot_from_wire(id, wire))
    }

    fn batch_update(&self, id: &DocumentId, batch: &Batch) -> Result<(), StoreError> {
        let url = format!("{}/documents/{}:batchUpdate", self.base_url, id);
        log::debug!("POST {url} ({} requests)", batch.len());
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token.secret())
            .json(&batch_to_wire(batch))
            .send()?;
        check_status(response)?;
        Ok(())
    }
}

// ============ Wire format: documents.get ============

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WireDocument {
    revision_id: String,
    body: WireBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireBody {
    content: Vec<WireStructuralElement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireStructuralElement {
    start_index: Option<usize>,
    end_index: Option<usize>,
    paragraph: Option<WireParagraph>,
    table: Option<WireTable>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireParagraph {
    elements: Vec<WireParagraphElement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireParagraphElement {
    start_index: Option<usize>,
    end_index: Option<usize>,
    text_run: Option<WireTextRun>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireTextRun {
    content: String,
    text_style: WireTextStyle,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireTextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    underline: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireTable {
    table_rows: Vec<WireTableRow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireTableRow {
    table_cells: Vec<WireTableCell>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireTableCell {
    content: Vec<WireStructuralElement>,
}

/// Flatten the body into paragraph blocks, descending into table cells
pub(crate) fn snapshot_from_wire(id: &DocumentId, wire: WireDocument) -> OffsetDocument {
    let mut blocks = Vec::new();
    collect_blocks(wire.body.content, &mut blocks);
    OffsetDocument {
        id: id.clone(),
        revision: Revision(wire.revision_id),
        unit: OffsetUnit::Utf16CodeUnits,
        blocks,
    }
}

fn collect_blocks(content: Vec<WireStructuralElement>, blocks: &mut Vec<Block>) {
    for element in content {
        if let Some(paragraph) = element.paragraph {
            let runs: Vec<TextRun> = paragraph
                .elements
                .into_iter()
                .filter_map(|e| {
                    let run = e.text_run?;
                    Some(TextRun {
                        span: wire_span(e.start_index, e.end_index),
                        bold: run.text_style.bold.unwrap_or(false),
                        text: run.content,
                    })
                })
                .collect();
            blocks.push(Block {
                span: wire_span(element.start_index, element.end_index),
                text: runs.iter().map(|r| r.text.as_str()).collect(),
                runs,
            });
        } else if let Some(table) = element.table {
            for cell in table.table_rows.into_iter().flat_map(|r| r.table_cells) {
                collect_blocks(cell.content, blocks);
            }
        }
    }
}

// The API omits zero-valued indexes
fn wire_span(start: Option<usize>, end: Option<usize>) -> Option<Span> {
    let end = end?;
    Some(Span::new(start.unwrap_or(0), end))
}

// ============ Wire format: documents.batchUpdate ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireBatchUpdate {
    requests: Vec<WireRequest>,
    write_control: WireWriteControl,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireWriteControl {
    required_revision_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum WireRequest {
    ReplaceAllText {
        #[serde(rename = "containsText")]
        contains_text: WireSubstringMatch,
        #[serde(rename = "replaceText")]
        replace_text: String,
    },
    DeleteContentRange {
        range: WireRange,
    },
    UpdateTextStyle {
        range: WireRange,
        #[serde(rename = "textStyle")]
        text_style: WireTextStyle,
        fields: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireSubstringMatch {
    text: String,
    match_case: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRange {
    start_index: usize,
    end_index: usize,
}

impl From<Span> for WireRange {
    fn from(span: Span) -> Self {
        WireRange {
            start_index: span.start,
            end_index: span.end,
        }
    }
}

pub(crate) fn batch_to_wire(batch: &Batch) -> WireBatchUpdate {
    let requests = batch
        .requests
        .iter()
        .map(|request| match request {
            EditRequest::ReplaceText {
                match_text,
                replacement,
                match_case,
            } => WireRequest::ReplaceAllText {
                contains_text: WireSubstringMatch {
                    text: match_text.clone(),
                    match_case: *match_case,
                },
                replace_text: replacement.clone(),
            },
            EditRequest::DeleteRange { span } => WireRequest::DeleteContentRange {
                range: (*span).into(),
            },
            EditRequest::ApplyStyle { span, style } => WireRequest::UpdateTextStyle {
                range: (*span).into(),
                text_style: WireTextStyle {
                    bold: style.bold.then_some(true),
                    italic: style.italic.then_some(true),
                    underline: style.underline.then_some(true),
                },
                fields: style.field_names().join(","),
            },
        })
        .collect();

    WireBatchUpdate {
        requests,
        write_control: WireWriteControl {
            required_revision_id: batch.base.0.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_snapshot_from_wire() {
        let wire: WireDocument = serde_json::from_value(json!({
            "documentId": "d1",
            "revisionId": "rev-7",
            "body": { "content": [
                { "endIndex": 1, "sectionBreak": {} },
                { "startIndex": 1, "endIndex": 12, "paragraph": { "elements": [
                    { "startIndex": 1, "endIndex": 6, "textRun": { "content": "Café ", "textStyle": { "bold": true } } },
                    { "startIndex": 6, "endIndex": 12, "textRun": { "content": "Acme\n", "textStyle": {} } }
                ]}},
                { "startIndex": 12, "endIndex": 30, "table": { "tableRows": [ { "tableCells": [ { "content": [
                    { "startIndex": 14, "endIndex": 19, "paragraph": { "elements": [
                        { "startIndex": 14, "endIndex": 19, "textRun": { "content": "cell\n" } }
                    ]}}
                ]}]}]}}
            ]}
        }))
        .unwrap();

        let doc = snapshot_from_wire(&DocumentId::new("d1"), wire);

        assert_eq!(doc.revision, Revision("rev-7".to_string()));
        assert_eq!(doc.unit, OffsetUnit::Utf16CodeUnits);
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[0].text, "Café Acme\n");
        assert_eq!(doc.blocks[0].span, Some(Span::new(1, 12)));
        assert!(doc.blocks[0].runs[0].bold);
        assert!(!doc.blocks[0].runs[1].bold);
        assert_eq!(doc.blocks[1].text, "cell\n");
    }

    #[test]
    fn test_missing_end_index_means_no_span() {
        let wire: WireDocument = serde_json::from_value(json!({
            "revisionId": "r",
            "body": { "content": [
                { "startIndex": 1, "paragraph": { "elements": [] } }
            ]}
        }))
        .unwrap();

        let doc = snapshot_from_wire(&DocumentId::new("d"), wire);
        assert_eq!(doc.blocks[0].span, None);
    }

    #[test]
    fn test_batch_to_wire() {
        let batch = Batch::new(
            Revision("rev-7".to_string()),
            vec![
                EditRequest::replace("{{name}}", "Ada"),
                EditRequest::delete(Span::new(3, 9)),
                EditRequest::bold(Span::new(1, 2)),
            ],
        );

        let value = serde_json::to_value(batch_to_wire(&batch)).unwrap();

        assert_eq!(
            value,
            json!({
                "requests": [
                    { "replaceAllText": {
                        "containsText": { "text": "{{name}}", "matchCase": true },
                        "replaceText": "Ada"
                    }},
                    { "deleteContentRange": { "range": { "startIndex": 3, "endIndex": 9 } } },
                    { "updateTextStyle": {
                        "range": { "startIndex": 1, "endIndex": 2 },
                        "textStyle": { "bold": true },
                        "fields": "bold"
                    }}
                ],
                "writeControl": { "requiredRevisionId": "rev-7" }
            })
        );
    }
}
