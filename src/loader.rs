//! Question repository loader.
//!
//! Performs the single read of the question resource at startup. The source
//! is either a local JSON file or an http(s) URL; both yield the same sorted
//! record set.

use std::cmp::Ordering;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::question::Question;

/// Largest question resource accepted (16 MiB).
pub const MAX_RESOURCE_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// Error Types
// ============================================================================

/// Failure to read or decode the question resource.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read question file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to fetch questions: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Question server responded with HTTP {0}")]
    Status(u16),

    #[error("Invalid question data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Question resource too large: {0} bytes (max 16 MiB)")]
    TooLarge(usize),
}

// ============================================================================
// Source
// ============================================================================

/// Where the question resource lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    File(PathBuf),
    Url(Url),
}

impl QuestionSource {
    /// Interpret a CLI/config string: http(s) URLs are fetched, anything else
    /// is treated as a filesystem path.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            if let Ok(url) = Url::parse(trimmed) {
                return Self::Url(url);
            }
            tracing::warn!(source = %trimmed, "Unparseable URL, treating as file path");
        }
        Self::File(PathBuf::from(trimmed))
    }
}

impl std::fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Read, decode and sort the question resource.
///
/// Records with missing fields are kept as-is (blank text) and counted in a
/// single warning. Records without an id get a positional `#n` id so list
/// identity stays unique.
pub async fn load_questions(
    source: &QuestionSource,
    client: &reqwest::Client,
) -> Result<Vec<Question>, LoadError> {
    let bytes = match source {
        QuestionSource::File(path) => {
            let bytes = tokio::fs::read(path).await?;
            if bytes.len() > MAX_RESOURCE_BYTES {
                return Err(LoadError::TooLarge(bytes.len()));
            }
            bytes
        }
        QuestionSource::Url(url) => fetch_bytes(url, client).await?,
    };

    let mut questions: Vec<Question> = serde_json::from_slice(&bytes)?;

    let mut degraded = 0usize;
    for (i, question) in questions.iter_mut().enumerate() {
        if question.id.is_empty() {
            question.id = format!("#{}", i);
            degraded += 1;
        } else if question.is_degraded() {
            degraded += 1;
        }
    }
    if degraded > 0 {
        tracing::warn!(
            source = %source,
            degraded,
            "Question records with missing fields will display blank"
        );
    }

    sort_questions(&mut questions);
    tracing::info!(source = %source, count = questions.len(), "Loaded questions");
    Ok(questions)
}

/// GET the resource, rejecting non-2xx statuses and oversized bodies.
async fn fetch_bytes(url: &Url, client: &reqwest::Client) -> Result<Vec<u8>, LoadError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }

    if let Some(len) = response.content_length() {
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        if len > MAX_RESOURCE_BYTES {
            return Err(LoadError::TooLarge(len));
        }
    }

    let body = response.bytes().await?;
    if body.len() > MAX_RESOURCE_BYTES {
        return Err(LoadError::TooLarge(body.len()));
    }
    Ok(body.to_vec())
}

/// Sort by category, then by question text. Byte order, so uppercase sorts
/// before lowercase. Stable, so equal keys keep their resource order.
pub fn sort_questions(questions: &mut [Question]) {
    questions.sort_by(compare_questions);
}

fn compare_questions(a: &Question, b: &Question) -> Ordering {
    a.category
        .cmp(&b.category)
        .then_with(|| a.question.cmp(&b.question))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Difficulty;

    fn q(id: &str, category: &str, question: &str) -> Question {
        Question {
            id: id.to_string(),
            category: category.to_string(),
            question: question.to_string(),
            answer: String::new(),
            difficulty: Difficulty::Unspecified,
        }
    }

    #[test]
    fn test_source_parse() {
        assert!(matches!(
            QuestionSource::parse("https://example.com/questions.json"),
            QuestionSource::Url(_)
        ));
        assert_eq!(
            QuestionSource::parse("  ./questions.json "),
            QuestionSource::File(PathBuf::from("./questions.json"))
        );
        assert!(matches!(
            QuestionSource::parse("ftp://example.com/q.json"),
            QuestionSource::File(_)
        ));
    }

    #[test]
    fn test_sort_by_category_then_question() {
        let mut questions = vec![
            q("1", "react", "What is JSX?"),
            q("2", "css", "What is the box model?"),
            q("3", "react", "What are hooks?"),
            q("4", "css", "Flexbox vs grid?"),
        ];
        sort_questions(&mut questions);
        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "2", "3", "1"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut questions = vec![q("a", "css", "Same"), q("b", "css", "Same")];
        sort_questions(&mut questions);
        assert_eq!(questions[0].id, "a");
        assert_eq!(questions[1].id, "b");
    }

    #[test]
    fn test_sort_compares_bytes_not_case_folded() {
        let mut questions = vec![q("1", "css", "how does z-index work?"), q("2", "css", "What is BEM?")];
        sort_questions(&mut questions);
        assert_eq!(questions[0].id, "2");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = QuestionSource::File(PathBuf::from("/tmp/prepdeck_test_missing.json"));
        let client = reqwest::Client::new();
        let err = load_questions(&source, &client).await.unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[tokio::test]
    async fn test_missing_ids_backfilled() {
        let dir = std::env::temp_dir().join("prepdeck_loader_test_ids");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("questions.json");
        std::fs::write(
            &path,
            r#"[{"category":"css","question":"B"},{"id":"x","category":"css","question":"A","answer":"ok"}]"#,
        )
        .unwrap();

        let client = reqwest::Client::new();
        let questions = load_questions(&QuestionSource::File(path), &client)
            .await
            .unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, "x");
        assert_eq!(questions[1].id, "#0");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_non_array_is_parse_error() {
        let dir = std::env::temp_dir().join("prepdeck_loader_test_object");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("questions.json");
        std::fs::write(&path, r#"{"questions": []}"#).unwrap();

        let client = reqwest::Client::new();
        let err = load_questions(&QuestionSource::File(path), &client)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        assert!(err.to_string().contains("Invalid question data"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
