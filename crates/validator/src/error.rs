//! 검증 파이프라인 에러 타입
//!
//! [`ValidatorError`]는 규칙 로딩, 엔트리 파싱, 검증 상태 전이 등
//! 파이프라인 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<ValidatorError> for VigilError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use vigil_core::error::{ConfigError, ParseError, RuleError, StateError, VigilError};

/// 검증 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// 규칙 문서 로딩 실패
    #[error("rule load error: {path}: {reason}")]
    RuleLoad {
        /// 규칙 문서 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 규칙 유효성 검증 실패
    #[error("rule validation error: rule '{rule_id}': {reason}")]
    RuleValidation {
        /// 문제가 된 규칙 ID
        rule_id: String,
        /// 검증 실패 사유
        reason: String,
    },

    /// 로그 엔트리 파싱 실패 (스트림 자체를 읽을 수 없는 경우)
    #[error("entry parse error: {0}")]
    EntryParse(#[from] ParseError),

    /// 허용되지 않는 검증기 상태에서의 호출
    #[error("invalid state: {0}")]
    InvalidState(#[from] StateError),

    /// 채널 통신 에러
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error in rule '{rule_id}': {reason}")]
    Regex {
        /// 문제가 된 규칙 ID
        rule_id: String,
        /// 컴파일 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl From<ValidatorError> for VigilError {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::RuleLoad { path, reason } => {
                VigilError::Rule(RuleError::Load { path, reason })
            }
            ValidatorError::RuleValidation { rule_id, reason }
            | ValidatorError::Regex { rule_id, reason } => {
                VigilError::Rule(RuleError::Validation { rule_id, reason })
            }
            ValidatorError::EntryParse(e) => VigilError::Parse(e),
            ValidatorError::InvalidState(e) => VigilError::State(e),
            ValidatorError::Io(e) => VigilError::Io(e),
            ValidatorError::Channel(msg) => VigilError::Io(std::io::Error::other(msg)),
            ValidatorError::Config { field, reason } => {
                VigilError::Config(ConfigError::InvalidValue { field, reason })
            }
        }
    }
}
