#![doc = include_str!("../README.md")]

pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, ParseError, RuleError, StateError, VigilError};

// 도메인 타입
pub use types::{
    FieldValue, LogEntry, PARSE_ERROR_RULE_ID, RobotSummary, Severity, UNKNOWN_ROBOT_ID,
    ValidationStatus, Violation,
};
