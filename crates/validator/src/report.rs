//! 보고서 -- 최종 상태의 직렬화 표현과 JSON 파일 출력

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use vigil_core::types::{ValidationStatus, Violation};

use crate::error::ValidatorError;
use crate::validator::ValidationState;

/// 전체 요약
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    /// 수집된 엔트리 수
    pub total_entries: usize,
    /// 통과 엔트리 수
    pub passed: usize,
    /// 실패 엔트리 수
    pub failed: usize,
    /// 통과 비율 (0.0 ~ 1.0)
    pub pass_rate: f64,
}

/// 로봇별 보고 항목
#[derive(Debug, Clone, Serialize)]
pub struct RobotReport {
    /// 최종 상태
    pub status: ValidationStatus,
    /// 이 로봇이 방출한 엔트리 수
    pub total_entries: usize,
    /// 이 로봇에 귀속된 위반 수
    pub violations: usize,
}

/// 최종 검증 보고서
///
/// finalize된 [`ValidationState`]의 직렬화 가능한 스냅샷입니다.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// 전체 요약
    pub summary: ReportSummary,
    /// 로봇 ID별 보고 항목
    pub robots: BTreeMap<String, RobotReport>,
    /// 규칙 ID별 위반 수
    pub violations_by_rule: BTreeMap<String, usize>,
    /// 심각도별 위반 수 (키: medium/high/critical)
    pub violations_by_severity: BTreeMap<String, usize>,
    /// 발생 순서대로의 전체 위반 목록
    pub violations: Vec<Violation>,
    /// 보고서 생성 시각 (RFC 3339 UTC)
    pub generated_at: String,
}

impl ValidationReport {
    /// finalize된 상태로부터 보고서를 만듭니다.
    pub fn from_state(state: &ValidationState) -> Self {
        let robots = state
            .robots
            .iter()
            .map(|(id, summary)| {
                (
                    id.clone(),
                    RobotReport {
                        status: summary.status,
                        total_entries: summary.total_entries,
                        violations: summary.violation_count,
                    },
                )
            })
            .collect();

        let violations_by_severity = state
            .violations_by_severity
            .iter()
            .map(|(severity, count)| (severity.as_str().to_owned(), *count))
            .collect();

        Self {
            summary: ReportSummary {
                total_entries: state.total_entries,
                passed: state.passed,
                failed: state.failed,
                pass_rate: state.pass_rate(),
            },
            robots,
            violations_by_rule: state.violations_by_rule.clone(),
            violations_by_severity,
            violations: state.violations.clone(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// 보고서 파일 출력기
pub struct Reporter;

impl Reporter {
    /// 보고서를 pretty JSON으로 파일에 씁니다.
    ///
    /// 상위 디렉토리가 없으면 생성합니다.
    ///
    /// # Errors
    /// 직렬화 실패 또는 파일 쓰기 실패 시 에러를 반환합니다.
    pub async fn write_json(
        report: &ValidationReport,
        path: impl AsRef<Path>,
    ) -> Result<(), ValidatorError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(report).map_err(|e| ValidatorError::Io(
            std::io::Error::other(format!("failed to serialize report: {e}")),
        ))?;
        tokio::fs::write(path, json).await?;

        tracing::info!(path = %path.display(), "report written");
        Ok(())
    }
}
