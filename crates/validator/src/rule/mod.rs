//! 규칙 모듈 -- 선언 규칙의 컴파일과 엔트리 평가
//!
//! - [`types`] -- 규칙 문서 스키마와 컴파일된 규칙
//! - [`loader`] -- JSON 규칙 문서 로딩
//! - [`ops`] -- 연산자 평가 (순수 함수)
//! - [`RuleEngine`] -- 엔트리 하나를 규칙 집합 전체에 평가

pub mod loader;
pub mod ops;
pub mod types;

pub use loader::RuleLoader;
pub use ops::{Outcome, evaluate};
pub use types::{Check, CompiledRule, ConditionSpec, Guard, RuleSetSpec, RuleSpec};

use vigil_core::types::{FieldValue, LogEntry, Violation};

/// 규칙 엔진
///
/// 컴파일된 규칙 집합을 보관하고 엔트리를 평가합니다.
/// 상태가 없으며, 같은 입력에는 항상 같은 출력을 냅니다.
/// 모든 규칙을 문서 순서대로 평가하고 중간에 중단하지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl RuleEngine {
    /// 컴파일된 규칙 집합으로 엔진을 생성합니다.
    pub fn new(rules: Vec<CompiledRule>) -> Self {
        Self { rules }
    }

    /// 보관 중인 규칙 목록
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// 규칙 수
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// 엔트리 하나를 모든 규칙에 평가하고 위반 목록을 반환합니다.
    ///
    /// 선행 조건이 있는 규칙은 조건이 성립할 때만 본 검사를 수행합니다.
    /// 조건은 위반으로 평가되지 않는 한 성립한 것으로 봅니다.
    pub fn evaluate(&self, entry: &LogEntry) -> Vec<Violation> {
        let mut violations = Vec::new();

        for rule in &self.rules {
            if let Some(guard) = &rule.guard {
                let guard_outcome = ops::evaluate(&guard.check, entry.field(&guard.field));
                if guard_outcome == Outcome::Violated {
                    continue;
                }
            }

            let actual = entry.field(&rule.field);
            if ops::evaluate(&rule.check, actual) == Outcome::Violated {
                violations.push(build_violation(rule, entry, actual));
            }
        }

        violations
    }
}

fn build_violation(rule: &CompiledRule, entry: &LogEntry, actual: Option<&FieldValue>) -> Violation {
    let expected = rule.check.describe();
    let message = match &rule.message {
        Some(template) => render_template(template, entry),
        None => {
            let shown = actual.map_or_else(|| "<missing>".to_owned(), ToString::to_string);
            format!("{}: expected {expected}, got {shown}", rule.field)
        }
    };

    Violation {
        rule_id: rule.id.clone(),
        rule_name: rule.name.clone(),
        severity: rule.severity,
        message,
        robot_id: entry.robot_id.clone(),
        timestamp: entry.timestamp.clone(),
        field: rule.field.clone(),
        actual: actual.cloned(),
        expected,
        log_index: entry.index,
    }
}

/// `{field_name}` 자리표시자를 엔트리의 실제 값으로 치환합니다.
///
/// 엔트리에 없는 필드를 참조하는 자리표시자는 그대로 둡니다.
fn render_template(template: &str, entry: &LogEntry) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match entry.field(name) {
                    Some(value) => out.push_str(&value.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
