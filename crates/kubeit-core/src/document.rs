//! Multi-document stream splitting
//!
//! A stream is either YAML (documents separated by `---` lines) or a JSON
//! stream of concatenated values. Documents are split before any of them is
//! parsed so that one malformed document cannot hide the others.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::LoadError;
use crate::meta::TypeMeta;

/// One document of a stream, not yet decoded
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Yaml(String),
    Json(JsonValue),
}

impl Document {
    /// Decode into any deserializable type
    ///
    /// Strictness comes from the target type (`deny_unknown_fields`).
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, String> {
        match self {
            Document::Yaml(text) => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            Document::Json(value) => {
                serde_json::from_value(value.clone()).map_err(|e| e.to_string())
            }
        }
    }

    pub fn type_meta(&self) -> Result<TypeMeta, LoadError> {
        self.decode::<TypeMeta>()
            .map_err(|message| LoadError::MetadataDecode { message })
    }
}

/// Split a stream into documents
///
/// Empty documents (only whitespace or comments) are dropped. A JSON syntax
/// error ends the stream since there is no separator to resync on.
pub fn split_documents(text: &str) -> Vec<Result<Document, LoadError>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if looks_like_json(text) {
        split_json(text)
    } else {
        split_yaml(text).into_iter().map(Ok).collect()
    }
}

fn looks_like_json(text: &str) -> bool {
    matches!(text.trim_start().chars().next(), Some('{') | Some('['))
}

fn split_json(text: &str) -> Vec<Result<Document, LoadError>> {
    let mut documents = Vec::new();

    for value in serde_json::Deserializer::from_str(text).into_iter::<JsonValue>() {
        match value {
            Ok(value) => documents.push(Ok(Document::Json(value))),
            Err(e) => {
                documents.push(Err(LoadError::MetadataDecode {
                    message: e.to_string(),
                }));
                break;
            }
        }
    }

    documents
}

fn split_yaml(text: &str) -> Vec<Document> {
    let mut documents = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if let Some(rest) = separator_remainder(line) {
            push_yaml(&mut documents, std::mem::take(&mut current));
            if !rest.trim().is_empty() {
                current.push_str(rest);
                current.push('\n');
            }
            continue;
        }

        if is_document_end(line) {
            push_yaml(&mut documents, std::mem::take(&mut current));
            continue;
        }

        current.push_str(line);
        current.push('\n');
    }
    push_yaml(&mut documents, current);

    documents
}

/// `---` starts a new document; anything after it on the line belongs to it
fn separator_remainder(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("---")?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

fn is_document_end(line: &str) -> bool {
    line.strip_prefix("...")
        .is_some_and(|rest| rest.trim().is_empty())
}

fn push_yaml(documents: &mut Vec<Document>, text: String) {
    if !is_blank(&text) {
        documents.push(Document::Yaml(text));
    }
}

fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line.starts_with('%')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml_docs(text: &str) -> Vec<String> {
        split_documents(text)
            .into_iter()
            .map(|d| match d.unwrap() {
                Document::Yaml(text) => text,
                Document::Json(_) => panic!("expected yaml"),
            })
            .collect()
    }

    #[test]
    fn test_single_document() {
        let docs = yaml_docs("kind: A\napiVersion: v1\n");
        assert_eq!(docs, vec!["kind: A\napiVersion: v1\n"]);
    }

    #[test]
    fn test_separators_and_empty_documents() {
        let docs = yaml_docs("---\nkind: A\n---\n# only a comment\n---\n\n---\nkind: B\n...\n");
        assert_eq!(docs, vec!["kind: A\n", "kind: B\n"]);
    }

    #[test]
    fn test_separator_with_inline_content() {
        let docs = yaml_docs("--- {kind: A}\n---\nkind: B\n");
        assert_eq!(docs, vec![" {kind: A}\n", "kind: B\n"]);
    }

    #[test]
    fn test_dashes_inside_values_are_not_separators() {
        let docs = yaml_docs("kind: A\nnote: ---x\n----\n");
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_broken_document_does_not_swallow_others() {
        let docs = split_documents("kind: A\n---\nkind: [unclosed\n---\nkind: C\n");
        assert_eq!(docs.len(), 3);

        let metas: Vec<_> = docs
            .iter()
            .map(|d| d.as_ref().unwrap().type_meta())
            .collect();
        assert!(metas[0].is_ok());
        assert!(matches!(metas[1], Err(LoadError::MetadataDecode { .. })));
        assert_eq!(metas[2].as_ref().unwrap().kind, "C");
    }

    #[test]
    fn test_json_stream() {
        let docs = split_documents("{\"kind\": \"A\"}\n{\"kind\": \"B\"}");
        assert_eq!(docs.len(), 2);
        let kinds: Vec<_> = docs
            .iter()
            .map(|d| d.as_ref().unwrap().type_meta().unwrap().kind)
            .collect();
        assert_eq!(kinds, vec!["A", "B"]);
    }

    #[test]
    fn test_json_syntax_error_ends_stream() {
        let docs = split_documents("{\"kind\": \"A\"} {\"kind\": ");
        assert_eq!(docs.len(), 2);
        assert!(docs[0].is_ok());
        assert!(matches!(docs[1], Err(LoadError::MetadataDecode { .. })));
    }

    #[test]
    fn test_empty_stream() {
        assert!(split_documents("").is_empty());
        assert!(split_documents("\n# nothing here\n").is_empty());
    }
}
