//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `vigil_`
//! - 모듈명: `validator_`
//! - 접미어: `_total` (counter)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 심각도 레이블 키 (medium, high, critical)
pub const LABEL_SEVERITY: &str = "severity";

// ─── Validator 메트릭 ──────────────────────────────────────────────

/// 수집된 전체 엔트리 수 (counter)
pub const VALIDATOR_ENTRIES_TOTAL: &str = "vigil_validator_entries_total";

/// 모든 규칙을 통과한 엔트리 수 (counter)
pub const VALIDATOR_ENTRIES_PASSED_TOTAL: &str = "vigil_validator_entries_passed_total";

/// 하나 이상의 위반이 발생한 엔트리 수 (counter)
pub const VALIDATOR_ENTRIES_FAILED_TOTAL: &str = "vigil_validator_entries_failed_total";

/// 발생한 위반 수 (counter, label: severity)
pub const VALIDATOR_VIOLATIONS_TOTAL: &str = "vigil_validator_violations_total";

/// 파싱 불가 엔트리 수 (counter)
pub const VALIDATOR_PARSE_ERRORS_TOTAL: &str = "vigil_validator_parse_errors_total";

/// 알림 싱크로 전달된 위반 수 (counter)
pub const VALIDATOR_ALERTS_SENT_TOTAL: &str = "vigil_validator_alerts_sent_total";

/// 채널 포화로 드롭된 알림 수 (counter)
pub const VALIDATOR_ALERTS_DROPPED_TOTAL: &str = "vigil_validator_alerts_dropped_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 시작 시점에 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        VALIDATOR_ENTRIES_TOTAL,
        "Total number of log entries ingested by the validator"
    );
    describe_counter!(
        VALIDATOR_ENTRIES_PASSED_TOTAL,
        "Total number of entries that satisfied every rule"
    );
    describe_counter!(
        VALIDATOR_ENTRIES_FAILED_TOTAL,
        "Total number of entries with at least one violation"
    );
    describe_counter!(
        VALIDATOR_VIOLATIONS_TOTAL,
        "Total number of rule violations, labeled by severity"
    );
    describe_counter!(
        VALIDATOR_PARSE_ERRORS_TOTAL,
        "Total number of malformed entries recorded as parse failures"
    );
    describe_counter!(
        VALIDATOR_ALERTS_SENT_TOTAL,
        "Total number of violations forwarded to the alert sink"
    );
    describe_counter!(
        VALIDATOR_ALERTS_DROPPED_TOTAL,
        "Total number of alert events dropped due to a full channel"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        VALIDATOR_ENTRIES_TOTAL,
        VALIDATOR_ENTRIES_PASSED_TOTAL,
        VALIDATOR_ENTRIES_FAILED_TOTAL,
        VALIDATOR_VIOLATIONS_TOTAL,
        VALIDATOR_PARSE_ERRORS_TOTAL,
        VALIDATOR_ALERTS_SENT_TOTAL,
        VALIDATOR_ALERTS_DROPPED_TOTAL,
    ];

    #[test]
    fn all_metrics_start_with_vigil_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("vigil_"),
                "Metric '{}' does not start with 'vigil_' prefix",
                name
            );
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        // describe_all() should not panic even without a recorder installed
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        assert_eq!(LABEL_SEVERITY.to_lowercase(), LABEL_SEVERITY);
    }
}
