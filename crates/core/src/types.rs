//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 로그 엔트리, 위반, 로봇 요약 등 모든 크레이트가 공유하는
//! 데이터 구조를 정의합니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// 파싱 실패 위반에 사용되는 예약 규칙 ID
///
/// 규칙 문서에서 이 ID를 사용하면 로딩이 거부됩니다.
pub const PARSE_ERROR_RULE_ID: &str = "PARSE_ERROR";

/// robot_id 필드가 없는 엔트리에 부여되는 기본 식별자
pub const UNKNOWN_ROBOT_ID: &str = "unknown";

/// 로그 필드 값
///
/// 엔트리의 각 필드가 가질 수 있는 스칼라 값입니다.
/// JSON의 중첩 객체는 dot-notation 키로 평탄화되며,
/// 배열과 null은 필드로 취급하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 불리언 값
    Bool(bool),
    /// 숫자 값 (정수 포함, f64로 통합)
    Number(f64),
    /// 문자열 값
    Text(String),
}

impl FieldValue {
    /// JSON 스칼라 값을 필드 값으로 변환합니다.
    ///
    /// 객체/배열/null은 `None`을 반환합니다.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// 타입 이름 (에러 메시지용)
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }

    /// 숫자 값이면 반환합니다.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// 문자열 값이면 반환합니다.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// 로그 엔트리
///
/// 로봇/장치가 방출한 구조화 로그 레코드 하나를 나타냅니다.
/// 생성 후에는 수정되지 않으며 정확히 한 번의 검증 패스를 거칩니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// 방출 로봇 식별자 (없으면 `"unknown"`)
    pub robot_id: String,
    /// ISO-8601 타임스탬프 (없으면 수신 시각)
    pub timestamp: String,
    /// 스트림 내 0부터 시작하는 위치
    pub index: usize,
    /// 평탄화된 필드 맵 (중첩 객체는 `location.x` 형태의 키)
    pub fields: BTreeMap<String, FieldValue>,
}

impl LogEntry {
    /// JSON 객체에서 로그 엔트리를 생성합니다.
    ///
    /// 객체가 아닌 값은 파싱 에러입니다. `robot_id`와 `timestamp`도
    /// 일반 필드로 함께 저장되어 규칙 평가 대상이 됩니다.
    pub fn from_json(value: &serde_json::Value, index: usize) -> Result<Self, ParseError> {
        let obj = value.as_object().ok_or(ParseError::NotAnObject { index })?;

        let mut fields = BTreeMap::new();
        for (key, val) in obj {
            flatten_into(&mut fields, key, val);
        }

        let robot_id = match fields.get("robot_id") {
            Some(v) => v.to_string(),
            None => UNKNOWN_ROBOT_ID.to_owned(),
        };
        let timestamp = match fields.get("timestamp") {
            Some(FieldValue::Text(s)) => s.clone(),
            _ => chrono::Utc::now().to_rfc3339(),
        };

        Ok(Self {
            robot_id,
            timestamp,
            index,
            fields,
        })
    }

    /// dot-notation 경로로 필드 값을 조회합니다.
    pub fn field(&self, path: &str) -> Option<&FieldValue> {
        self.fields.get(path)
    }
}

/// 중첩 JSON 값을 dot-notation 키로 평탄화하여 맵에 넣습니다.
fn flatten_into(fields: &mut BTreeMap<String, FieldValue>, prefix: &str, value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map {
                flatten_into(fields, &format!("{prefix}.{key}"), val);
            }
        }
        other => {
            if let Some(fv) = FieldValue::from_json(other) {
                fields.insert(prefix.to_owned(), fv);
            }
        }
    }
}

/// 심각도 레벨
///
/// 규칙과 위반에 부여되는 메타데이터입니다.
/// `Ord` 구현으로 비교가 가능합니다 (`Medium < High < Critical`).
/// 심각도는 평가 순서나 출력 필터링에 영향을 주지 않습니다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 중간 심각도
    #[default]
    Medium,
    /// 높은 심각도
    High,
    /// 치명적 — 즉시 대응 필요
    Critical,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }

    /// 소문자 이름 (메트릭 레이블, JSON 키용)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// 검증 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    /// 위반 없음
    #[default]
    Pass,
    /// 하나 이상의 위반 발생
    Fail,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// 안전 규칙 위반
///
/// 한 엔트리가 한 규칙을 위반했음을 나타냅니다. 생성 후 불변입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// 위반된 규칙 ID
    pub rule_id: String,
    /// 규칙 이름
    pub rule_name: String,
    /// 규칙의 심각도
    pub severity: Severity,
    /// 사람이 읽을 수 있는 설명 (필드 값 치환 완료)
    pub message: String,
    /// 위반 엔트리의 로봇 ID
    pub robot_id: String,
    /// 위반 엔트리의 타임스탬프
    pub timestamp: String,
    /// 검사 대상 필드
    pub field: String,
    /// 엔트리의 실제 값 (필드 부재 시 None)
    pub actual: Option<FieldValue>,
    /// 규칙이 기대한 조건의 설명
    pub expected: String,
    /// 스트림 내 엔트리 위치
    pub log_index: usize,
}

impl Violation {
    /// 파싱 불가능한 엔트리에 대한 합성 위반을 생성합니다.
    pub fn parse_failure(log_index: usize, reason: &str) -> Self {
        Self {
            rule_id: PARSE_ERROR_RULE_ID.to_owned(),
            rule_name: "Log entry parse failure".to_owned(),
            severity: Severity::High,
            message: format!("entry {log_index} could not be parsed: {reason}"),
            robot_id: UNKNOWN_ROBOT_ID.to_owned(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            field: String::new(),
            actual: None,
            expected: "well-formed JSON object".to_owned(),
            log_index,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} robot={} entry={}: {}",
            self.severity, self.rule_id, self.robot_id, self.log_index, self.message,
        )
    }
}

/// 로봇별 검증 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotSummary {
    /// 로봇 식별자
    pub robot_id: String,
    /// 이 로봇이 방출한 엔트리 수
    pub total_entries: usize,
    /// 이 로봇에 귀속된 위반 수
    pub violation_count: usize,
    /// 최종 상태 (위반이 하나라도 있으면 FAIL)
    pub status: ValidationStatus,
}

impl RobotSummary {
    /// 엔트리가 없는 새 요약을 생성합니다.
    pub fn new(robot_id: impl Into<String>) -> Self {
        Self {
            robot_id: robot_id.into(),
            total_entries: 0,
            violation_count: 0,
            status: ValidationStatus::Pass,
        }
    }
}
