//! 스트리밍 검증기 -- 엔트리별 평가와 증분 집계
//!
//! 엔트리를 하나씩 받아 규칙 엔진에 평가시키고,
//! 전체/로봇별 상태를 증분으로 갱신합니다. 전체 스트림을 메모리에
//! 올리지 않으며, 스트림 도중 어느 시점에도 집계 상태는 일관됩니다.

use std::collections::BTreeMap;

use metrics::counter;
use serde::Serialize;
use vigil_core::error::StateError;
use vigil_core::metrics::{
    LABEL_SEVERITY, VALIDATOR_ALERTS_SENT_TOTAL, VALIDATOR_ENTRIES_FAILED_TOTAL,
    VALIDATOR_ENTRIES_PASSED_TOTAL, VALIDATOR_ENTRIES_TOTAL, VALIDATOR_PARSE_ERRORS_TOTAL,
    VALIDATOR_VIOLATIONS_TOTAL,
};
use vigil_core::types::{
    LogEntry, RobotSummary, Severity, UNKNOWN_ROBOT_ID, ValidationStatus, Violation,
};

use crate::alert::AlertSink;
use crate::error::ValidatorError;
use crate::rule::RuleEngine;

/// 검증기 수명 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// 엔트리 수집 중
    Open,
    /// finalize 완료, 더 이상 수집 불가
    Closed,
}

/// 누적 검증 상태
///
/// 스트림 도중에는 부분 결과로, finalize 후에는 최종 결과로 쓰입니다.
/// 항상 `total_entries == passed + failed`가 성립합니다.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationState {
    /// 수집된 엔트리 수 (파싱 실패 포함)
    pub total_entries: usize,
    /// 위반 없이 통과한 엔트리 수
    pub passed: usize,
    /// 하나 이상의 위반이 발생한 엔트리 수
    pub failed: usize,
    /// 발생 순서대로 누적된 전체 위반 목록
    pub violations: Vec<Violation>,
    /// 로봇별 요약
    pub robots: BTreeMap<String, RobotSummary>,
    /// 규칙 ID별 위반 수
    pub violations_by_rule: BTreeMap<String, usize>,
    /// 심각도별 위반 수
    pub violations_by_severity: BTreeMap<Severity, usize>,
}

impl ValidationState {
    /// 통과 비율 (0.0 ~ 1.0, 엔트리가 없으면 0.0)
    pub fn pass_rate(&self) -> f64 {
        if self.total_entries == 0 {
            return 0.0;
        }
        self.passed as f64 / self.total_entries as f64
    }
}

/// 스트리밍 검증기
///
/// 상태 기계는 Open에서 시작해 [`Self::finalize`]로 Closed가 됩니다.
/// Closed 이후의 수집 시도는 에러입니다.
pub struct StreamValidator {
    engine: RuleEngine,
    sink: Box<dyn AlertSink>,
    state: ValidationState,
    phase: Phase,
}

impl StreamValidator {
    /// 규칙 엔진과 알림 싱크로 검증기를 생성합니다.
    pub fn new(engine: RuleEngine, sink: Box<dyn AlertSink>) -> Self {
        Self {
            engine,
            sink,
            state: ValidationState::default(),
            phase: Phase::Open,
        }
    }

    /// 현재까지의 집계 상태 (스트림 도중에도 일관됨)
    pub fn state(&self) -> &ValidationState {
        &self.state
    }

    /// 규칙 엔진
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    fn ensure_open(&self) -> Result<(), ValidatorError> {
        match self.phase {
            Phase::Open => Ok(()),
            Phase::Closed => Err(StateError::AlreadyFinalized.into()),
        }
    }

    /// 엔트리 하나를 평가하고 집계에 반영합니다.
    ///
    /// 위반 각각은 이 호출이 반환되기 전에 알림 싱크로 전달됩니다.
    ///
    /// # Errors
    /// finalize 이후에 호출하면 [`StateError::AlreadyFinalized`].
    pub fn ingest(&mut self, entry: &LogEntry) -> Result<(), ValidatorError> {
        self.ensure_open()?;

        let violations = self.engine.evaluate(entry);
        counter!(VALIDATOR_ENTRIES_TOTAL).increment(1);

        self.state.total_entries += 1;
        let robot = self
            .state
            .robots
            .entry(entry.robot_id.clone())
            .or_insert_with(|| RobotSummary::new(entry.robot_id.clone()));
        robot.total_entries += 1;

        if violations.is_empty() {
            self.state.passed += 1;
            counter!(VALIDATOR_ENTRIES_PASSED_TOTAL).increment(1);
            tracing::debug!(robot_id = %entry.robot_id, index = entry.index, "entry passed");
            return Ok(());
        }

        self.state.failed += 1;
        counter!(VALIDATOR_ENTRIES_FAILED_TOTAL).increment(1);
        robot.violation_count += violations.len();

        for violation in violations {
            tracing::debug!(
                rule_id = %violation.rule_id,
                robot_id = %violation.robot_id,
                index = violation.log_index,
                "rule violated"
            );
            counter!(VALIDATOR_VIOLATIONS_TOTAL, LABEL_SEVERITY => violation.severity.as_str())
                .increment(1);
            self.record(violation);
        }

        Ok(())
    }

    /// 파싱 불가 엔트리를 합성 위반으로 집계합니다.
    ///
    /// 엔트리는 실패로 계수되고 스트림은 계속됩니다.
    ///
    /// # Errors
    /// finalize 이후에 호출하면 [`StateError::AlreadyFinalized`].
    pub fn ingest_parse_failure(
        &mut self,
        index: usize,
        reason: &str,
    ) -> Result<(), ValidatorError> {
        self.ensure_open()?;

        tracing::warn!(index, reason, "malformed entry recorded as parse failure");
        counter!(VALIDATOR_ENTRIES_TOTAL).increment(1);
        counter!(VALIDATOR_ENTRIES_FAILED_TOTAL).increment(1);
        counter!(VALIDATOR_PARSE_ERRORS_TOTAL).increment(1);

        let violation = Violation::parse_failure(index, reason);
        counter!(VALIDATOR_VIOLATIONS_TOTAL, LABEL_SEVERITY => violation.severity.as_str())
            .increment(1);

        self.state.total_entries += 1;
        self.state.failed += 1;
        let robot = self
            .state
            .robots
            .entry(UNKNOWN_ROBOT_ID.to_owned())
            .or_insert_with(|| RobotSummary::new(UNKNOWN_ROBOT_ID));
        robot.total_entries += 1;
        robot.violation_count += 1;

        self.record(violation);
        Ok(())
    }

    /// 위반을 집계에 반영하고 싱크에 통지합니다.
    fn record(&mut self, violation: Violation) {
        *self
            .state
            .violations_by_rule
            .entry(violation.rule_id.clone())
            .or_insert(0) += 1;
        *self
            .state
            .violations_by_severity
            .entry(violation.severity)
            .or_insert(0) += 1;

        self.sink.notify(&violation);
        counter!(VALIDATOR_ALERTS_SENT_TOTAL).increment(1);

        self.state.violations.push(violation);
    }

    /// 스트림을 닫고 최종 상태를 반환합니다.
    ///
    /// 로봇별 최종 상태를 확정합니다. 이후 어떤 수집도 허용되지 않습니다.
    ///
    /// # Errors
    /// 이미 finalize된 경우 [`StateError::NotOpen`].
    pub fn finalize(&mut self) -> Result<ValidationState, ValidatorError> {
        if self.phase == Phase::Closed {
            return Err(StateError::NotOpen {
                reason: "finalize called twice".to_owned(),
            }
            .into());
        }
        self.phase = Phase::Closed;

        for robot in self.state.robots.values_mut() {
            robot.status = if robot.violation_count > 0 {
                ValidationStatus::Fail
            } else {
                ValidationStatus::Pass
            };
        }

        tracing::info!(
            total = self.state.total_entries,
            passed = self.state.passed,
            failed = self.state.failed,
            violations = self.state.violations.len(),
            "validation finalized"
        );

        Ok(std::mem::take(&mut self.state))
    }
}
