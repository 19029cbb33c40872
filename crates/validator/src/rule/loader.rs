//! 규칙 문서 로더 -- JSON 규칙 문서를 디스크에서 로드합니다.
//!
//! 문서 전체를 한 번에 읽어 구조 검증과 컴파일까지 수행합니다.
//! 어느 한 규칙이라도 유효하지 않으면 로딩 전체가 실패합니다.

use std::collections::HashSet;
use std::path::Path;

use vigil_core::types::PARSE_ERROR_RULE_ID;

use crate::error::ValidatorError;

use super::types::{CompiledRule, RuleSetSpec};

/// 규칙 문서 크기 상한 (바이트)
const MAX_RULE_FILE_SIZE: u64 = 1024 * 1024; // 1MB

/// 규칙 수 상한
const MAX_RULES_COUNT: usize = 1_000;

/// 규칙 문서 로더
pub struct RuleLoader;

impl RuleLoader {
    /// 파일에서 규칙 문서를 로드하고 컴파일합니다.
    ///
    /// # Errors
    /// - 파일을 읽을 수 없거나 크기 상한을 초과하는 경우
    /// - 문서가 유효한 JSON이 아니거나 스키마에 맞지 않는 경우
    /// - 개별 규칙 컴파일 실패 ([`Self::parse_json`] 참조)
    pub async fn load_file(path: impl AsRef<Path>) -> Result<Vec<CompiledRule>, ValidatorError> {
        let path = path.as_ref();
        let load_err = |reason: String| ValidatorError::RuleLoad {
            path: path.display().to_string(),
            reason,
        };

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| load_err(format!("failed to stat file: {e}")))?;
        if metadata.len() > MAX_RULE_FILE_SIZE {
            return Err(load_err(format!(
                "file too large: {} bytes (max: {MAX_RULE_FILE_SIZE})",
                metadata.len()
            )));
        }

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| load_err(format!("failed to read file: {e}")))?;

        let rules = Self::parse_json(&text).map_err(|e| match e {
            // 구문 수준 실패는 경로를 함께 보고한다
            ValidatorError::RuleLoad { reason, .. } => load_err(reason),
            other => other,
        })?;

        tracing::info!(
            path = %path.display(),
            count = rules.len(),
            "loaded safety rules"
        );

        Ok(rules)
    }

    /// JSON 텍스트에서 규칙 집합을 파싱하고 컴파일합니다.
    ///
    /// 문서 순서가 보존됩니다. 컴파일은 결정적이며 부수 효과가 없습니다.
    ///
    /// # Errors
    /// - JSON 구문 오류 또는 스키마 불일치
    /// - 중복 규칙 ID 또는 예약 ID(`PARSE_ERROR`) 사용
    /// - 개별 규칙의 연산자/기준 값 문제
    pub fn parse_json(text: &str) -> Result<Vec<CompiledRule>, ValidatorError> {
        let spec: RuleSetSpec =
            serde_json::from_str(text).map_err(|e| ValidatorError::RuleLoad {
                path: "(inline)".to_owned(),
                reason: format!("invalid rule document: {e}"),
            })?;

        if spec.rules.len() > MAX_RULES_COUNT {
            return Err(ValidatorError::RuleLoad {
                path: "(inline)".to_owned(),
                reason: format!("too many rules: {} (max: {MAX_RULES_COUNT})", spec.rules.len()),
            });
        }

        let mut rules = Vec::with_capacity(spec.rules.len());
        let mut seen_ids = HashSet::new();

        for rule_spec in &spec.rules {
            let rule = rule_spec.compile()?;

            if rule.id == PARSE_ERROR_RULE_ID {
                return Err(ValidatorError::RuleValidation {
                    rule_id: rule.id,
                    reason: format!("rule id '{PARSE_ERROR_RULE_ID}' is reserved"),
                });
            }
            if !seen_ids.insert(rule.id.clone()) {
                return Err(ValidatorError::RuleValidation {
                    rule_id: rule.id.clone(),
                    reason: "duplicate rule id".to_owned(),
                });
            }

            rules.push(rule);
        }

        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_minimal_document() {
        let doc = json!({"rules": [
            {"id": "a", "field": "speed", "operator": "<=", "threshold": 2.0},
        ]});
        let rules = RuleLoader::parse_json(&doc.to_string()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, "a");
    }

    #[test]
    fn rejects_invalid_json() {
        let err = RuleLoader::parse_json("{not json").unwrap_err();
        assert!(matches!(err, ValidatorError::RuleLoad { .. }));
    }

    #[test]
    fn rejects_duplicate_rule_ids() {
        let doc = json!({"rules": [
            {"id": "a", "field": "x", "operator": "exists", "threshold": true},
            {"id": "a", "field": "y", "operator": "exists", "threshold": true},
        ]});
        let err = RuleLoader::parse_json(&doc.to_string()).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_reserved_rule_id() {
        let doc = json!({"rules": [
            {"id": "PARSE_ERROR", "field": "x", "operator": "exists", "threshold": true},
        ]});
        let err = RuleLoader::parse_json(&doc.to_string()).unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn one_bad_rule_fails_the_whole_document() {
        let doc = json!({"rules": [
            {"id": "good", "field": "x", "operator": "exists", "threshold": true},
            {"id": "bad", "field": "y", "operator": "between", "threshold": 1},
        ]});
        let err = RuleLoader::parse_json(&doc.to_string()).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[tokio::test]
    async fn load_file_reads_and_compiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        let doc = json!({"rules": [
            {"id": "a", "field": "speed", "operator": "<=", "threshold": 2.0},
            {"id": "b", "field": "status", "operator": "in", "threshold": ["idle"]},
        ]});
        tokio::fs::write(&path, doc.to_string()).await.unwrap();

        let rules = RuleLoader::load_file(&path).await.unwrap();
        assert_eq!(rules.len(), 2);
    }

    #[tokio::test]
    async fn load_file_reports_missing_file_with_path() {
        let err = RuleLoader::load_file("/nonexistent/rules.json").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/nonexistent/rules.json"));
    }
}
