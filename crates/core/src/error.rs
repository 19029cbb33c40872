//! 에러 타입 — 도메인별 에러 정의

/// Vigil 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 규칙 로딩/검증 에러
    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    /// 로그 엔트리 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 검증기 상태 전이 에러
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 규칙 로딩/검증 에러
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// 규칙 문서를 읽거나 파싱할 수 없음
    #[error("failed to load rules from '{path}': {reason}")]
    Load { path: String, reason: String },

    /// 개별 규칙이 제약을 위반함
    #[error("invalid rule '{rule_id}': {reason}")]
    Validation { rule_id: String, reason: String },
}

/// 로그 엔트리 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// JSON 구문 오류
    #[error("entry {index} is not valid JSON: {reason}")]
    Json { index: usize, reason: String },

    /// JSON 객체가 아닌 엔트리
    #[error("entry {index} is not a JSON object")]
    NotAnObject { index: usize },

    /// 입력 데이터 초과
    #[error("entry {index} too large: {size} bytes (max: {max})")]
    TooLarge { index: usize, size: usize, max: usize },
}

/// 검증기 상태 전이 에러
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// finalize 이후의 ingest 시도
    #[error("validator already finalized; no further entries accepted")]
    AlreadyFinalized,

    /// 중복 finalize 시도
    #[error("validator is not open: {reason}")]
    NotOpen { reason: String },
}
