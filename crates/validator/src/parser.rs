//! 로그 입력 파서 -- JSON 배열 문서와 줄 단위 JSON 스트림
//!
//! 두 입력 형태를 지원합니다.
//! - JSON 배열 문서: 전체를 한 번에 파싱
//! - 줄 단위 JSON(JSONL): 한 줄에 객체 하나, 증분 파싱
//!
//! 개별 레코드의 파싱 실패는 스트림을 중단하지 않고
//! [`ParsedRecord::Failed`]로 표면화됩니다.

use vigil_core::error::ParseError;
use vigil_core::types::LogEntry;

use crate::error::ValidatorError;

/// 파싱 결과 레코드 하나
///
/// 실패도 레코드입니다. 검증기는 실패 레코드를 합성 위반으로 집계합니다.
#[derive(Debug, Clone)]
pub enum ParsedRecord {
    /// 정상 파싱된 엔트리
    Entry(LogEntry),
    /// 파싱 불가 레코드
    Failed {
        /// 스트림 내 위치
        index: usize,
        /// 실패 사유
        reason: String,
    },
}

/// JSON 배열 문서를 레코드 목록으로 파싱합니다.
///
/// 배열의 원소 중 객체가 아닌 것은 개별 실패 레코드가 됩니다.
///
/// # Errors
/// 문서 자체가 유효한 JSON 배열이 아니면 입력 전체를 읽을 수 없는 것으로
/// 간주하고 실패합니다.
pub fn parse_array(text: &str) -> Result<Vec<ParsedRecord>, ValidatorError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ParseError::Json {
            index: 0,
            reason: format!("input document is not valid JSON: {e}"),
        })?;

    let items = value.as_array().ok_or_else(|| ParseError::Json {
        index: 0,
        reason: "input document is not a JSON array".to_owned(),
    })?;

    let records = items
        .iter()
        .enumerate()
        .map(|(index, item)| match LogEntry::from_json(item, index) {
            Ok(entry) => ParsedRecord::Entry(entry),
            Err(e) => ParsedRecord::Failed {
                index,
                reason: e.to_string(),
            },
        })
        .collect();

    Ok(records)
}

/// 줄 단위 JSON 파서
///
/// 빈 줄과 `#`으로 시작하는 주석 줄은 건너뜁니다.
/// 레코드 인덱스는 건너뛴 줄을 소비하지 않습니다.
#[derive(Debug)]
pub struct LineParser {
    next_index: usize,
    max_line_bytes: usize,
}

impl LineParser {
    /// 줄 크기 상한과 함께 파서를 생성합니다.
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            next_index: 0,
            max_line_bytes,
        }
    }

    /// 지금까지 소비한 레코드 수
    pub fn record_count(&self) -> usize {
        self.next_index
    }

    /// 한 줄을 파싱합니다. 빈 줄/주석 줄은 `None`.
    pub fn parse_line(&mut self, line: &str) -> Option<ParsedRecord> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let index = self.next_index;
        self.next_index += 1;

        if line.len() > self.max_line_bytes {
            let e = ParseError::TooLarge {
                index,
                size: line.len(),
                max: self.max_line_bytes,
            };
            return Some(ParsedRecord::Failed {
                index,
                reason: e.to_string(),
            });
        }

        let record = match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(value) => match LogEntry::from_json(&value, index) {
                Ok(entry) => ParsedRecord::Entry(entry),
                Err(e) => ParsedRecord::Failed {
                    index,
                    reason: e.to_string(),
                },
            },
            Err(e) => ParsedRecord::Failed {
                index,
                reason: format!("invalid JSON: {e}"),
            },
        };

        Some(record)
    }
}
