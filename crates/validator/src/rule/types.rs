//! 안전 규칙 데이터 타입
//!
//! JSON 규칙 문서에서 역직렬화되는 선언 구조체와,
//! 컴파일을 거쳐 평가에 사용되는 [`CompiledRule`]을 정의합니다.

use std::fmt;

use regex::Regex;
use serde::Deserialize;
use vigil_core::types::{FieldValue, Severity};

use crate::error::ValidatorError;

/// 규칙 문서 전체 -- `{"rules": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSetSpec {
    /// 선언된 규칙 목록 (문서 내 순서가 평가 순서)
    pub rules: Vec<RuleSpec>,
}

/// 선언 규칙 하나 -- 규칙 문서의 배열 원소에 대응합니다.
///
/// # JSON 스키마
/// ```json
/// {
///   "id": "speed_limit",
///   "name": "Speed limit in dock zone",
///   "field": "speed",
///   "operator": "<=",
///   "threshold": 2.5,
///   "severity": "critical",
///   "message": "robot moving at {speed} m/s",
///   "condition": { "field": "zone", "operator": "==", "value": "dock" }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    /// 규칙 고유 ID (문서 내에서 유일해야 함)
    pub id: String,
    /// 규칙 이름 (생략 시 id 사용)
    #[serde(default)]
    pub name: Option<String>,
    /// 규칙 설명
    #[serde(default)]
    pub description: String,
    /// 검사 대상 필드 (dot-notation 허용)
    pub field: String,
    /// 연산자 이름
    pub operator: String,
    /// 비교 기준 값 (`exists`를 제외한 모든 연산자에 필요)
    #[serde(default, alias = "value")]
    pub threshold: Option<serde_json::Value>,
    /// 심각도 (기본값 medium)
    #[serde(default)]
    pub severity: Severity,
    /// 메시지 템플릿 (`{field_name}` 자리표시자 치환)
    #[serde(default)]
    pub message: Option<String>,
    /// 선행 조건 -- 조건이 성립할 때만 본 검사를 수행
    #[serde(default)]
    pub condition: Option<ConditionSpec>,
}

/// 선행 조건 -- 중첩 없는 단순 검사만 허용됩니다.
///
/// `deny_unknown_fields`로 조건 안의 `condition` 키를 거부하여
/// 1단계를 넘는 중첩을 역직렬화 단계에서 차단합니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionSpec {
    /// 조건 대상 필드
    pub field: String,
    /// 조건 연산자
    pub operator: String,
    /// 조건 비교 값
    #[serde(default, alias = "threshold")]
    pub value: Option<serde_json::Value>,
}

/// 컴파일된 검사 -- 연산자와 타입 검증을 마친 기준 값의 쌍
///
/// 정규식은 컴파일 시점에 한 번만 빌드됩니다.
#[derive(Debug, Clone)]
pub enum Check {
    /// `>=` (숫자 전용)
    Gte(f64),
    /// `>` (숫자 전용)
    Gt(f64),
    /// `<=` (숫자 전용)
    Lte(f64),
    /// `<` (숫자 전용)
    Lt(f64),
    /// `==` (스칼라 동등)
    Eq(FieldValue),
    /// `!=` (스칼라 비동등)
    Ne(FieldValue),
    /// `in` (집합 포함)
    In(Vec<FieldValue>),
    /// `not_in` (집합 배제)
    NotIn(Vec<FieldValue>),
    /// `regex` (문자열이 패턴과 일치해야 함)
    Matches(Regex),
    /// `not_regex` (문자열이 패턴과 일치하면 위반)
    NotMatches(Regex),
    /// `exists` (true: 필드 필수, false: 필드 금지)
    Exists(bool),
    /// `contains` (부분 문자열)
    Contains(String),
    /// `starts_with` (접두사)
    StartsWith(String),
    /// `ends_with` (접미사)
    EndsWith(String),
}

impl Check {
    /// 연산자 이름과 기준 값으로부터 검사를 컴파일합니다.
    ///
    /// # Errors
    /// - 알 수 없는 연산자 이름
    /// - 연산자와 기준 값의 타입 불일치
    /// - 정규식 컴파일 실패
    pub fn compile(
        rule_id: &str,
        operator: &str,
        threshold: Option<&serde_json::Value>,
    ) -> Result<Self, ValidatorError> {
        let validation = |reason: String| ValidatorError::RuleValidation {
            rule_id: rule_id.to_owned(),
            reason,
        };

        match operator {
            ">=" | ">" | "<=" | "<" => {
                let n = threshold
                    .and_then(serde_json::Value::as_f64)
                    .ok_or_else(|| {
                        validation(format!("operator '{operator}' requires a numeric threshold"))
                    })?;
                Ok(match operator {
                    ">=" => Self::Gte(n),
                    ">" => Self::Gt(n),
                    "<=" => Self::Lte(n),
                    _ => Self::Lt(n),
                })
            }
            "==" | "!=" => {
                let value = threshold
                    .and_then(FieldValue::from_json)
                    .ok_or_else(|| {
                        validation(format!("operator '{operator}' requires a scalar threshold"))
                    })?;
                Ok(if operator == "==" {
                    Self::Eq(value)
                } else {
                    Self::Ne(value)
                })
            }
            "in" | "not_in" => {
                let items = threshold
                    .and_then(serde_json::Value::as_array)
                    .ok_or_else(|| {
                        validation(format!("operator '{operator}' requires an array threshold"))
                    })?;
                if items.is_empty() {
                    return Err(validation(format!(
                        "operator '{operator}' requires a non-empty array"
                    )));
                }
                let set = items
                    .iter()
                    .map(|v| {
                        FieldValue::from_json(v).ok_or_else(|| {
                            validation(format!(
                                "operator '{operator}' set must contain only scalars"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(if operator == "in" {
                    Self::In(set)
                } else {
                    Self::NotIn(set)
                })
            }
            "regex" | "not_regex" => {
                let pattern = threshold.and_then(serde_json::Value::as_str).ok_or_else(|| {
                    validation(format!("operator '{operator}' requires a string pattern"))
                })?;
                let regex = Regex::new(pattern).map_err(|e| ValidatorError::Regex {
                    rule_id: rule_id.to_owned(),
                    reason: e.to_string(),
                })?;
                Ok(if operator == "regex" {
                    Self::Matches(regex)
                } else {
                    Self::NotMatches(regex)
                })
            }
            "exists" => {
                let required = threshold
                    .and_then(serde_json::Value::as_bool)
                    .ok_or_else(|| {
                        validation("operator 'exists' requires a boolean threshold".to_owned())
                    })?;
                Ok(Self::Exists(required))
            }
            "contains" | "starts_with" | "ends_with" => {
                let s = threshold.and_then(serde_json::Value::as_str).ok_or_else(|| {
                    validation(format!("operator '{operator}' requires a string threshold"))
                })?;
                Ok(match operator {
                    "contains" => Self::Contains(s.to_owned()),
                    "starts_with" => Self::StartsWith(s.to_owned()),
                    _ => Self::EndsWith(s.to_owned()),
                })
            }
            other => Err(validation(format!("unknown operator '{other}'"))),
        }
    }

    /// 검사가 기대하는 조건의 서술 (위반 메시지용)
    pub fn describe(&self) -> String {
        match self {
            Self::Gte(n) => format!(">= {n}"),
            Self::Gt(n) => format!("> {n}"),
            Self::Lte(n) => format!("<= {n}"),
            Self::Lt(n) => format!("< {n}"),
            Self::Eq(v) => format!("== {v}"),
            Self::Ne(v) => format!("!= {v}"),
            Self::In(set) => format!("in {}", describe_set(set)),
            Self::NotIn(set) => format!("not in {}", describe_set(set)),
            Self::Matches(re) => format!("matches /{}/", re.as_str()),
            Self::NotMatches(re) => format!("does not match /{}/", re.as_str()),
            Self::Exists(true) => "present".to_owned(),
            Self::Exists(false) => "absent".to_owned(),
            Self::Contains(s) => format!("contains \"{s}\""),
            Self::StartsWith(s) => format!("starts with \"{s}\""),
            Self::EndsWith(s) => format!("ends with \"{s}\""),
        }
    }
}

fn describe_set(set: &[FieldValue]) -> String {
    let items: Vec<String> = set.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

// Regex는 PartialEq를 제공하지 않으므로 패턴 문자열로 비교합니다.
impl PartialEq for Check {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Gte(a), Self::Gte(b))
            | (Self::Gt(a), Self::Gt(b))
            | (Self::Lte(a), Self::Lte(b))
            | (Self::Lt(a), Self::Lt(b)) => a == b,
            (Self::Eq(a), Self::Eq(b)) | (Self::Ne(a), Self::Ne(b)) => a == b,
            (Self::In(a), Self::In(b)) | (Self::NotIn(a), Self::NotIn(b)) => a == b,
            (Self::Matches(a), Self::Matches(b))
            | (Self::NotMatches(a), Self::NotMatches(b)) => a.as_str() == b.as_str(),
            (Self::Exists(a), Self::Exists(b)) => a == b,
            (Self::Contains(a), Self::Contains(b))
            | (Self::StartsWith(a), Self::StartsWith(b))
            | (Self::EndsWith(a), Self::EndsWith(b)) => a == b,
            _ => false,
        }
    }
}

/// 컴파일된 선행 조건
#[derive(Debug, Clone, PartialEq)]
pub struct Guard {
    /// 조건 대상 필드
    pub field: String,
    /// 조건 검사
    pub check: Check,
}

/// 컴파일된 규칙 -- 구조 검증과 타입 검사를 마친 평가 단위
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    /// 규칙 고유 ID
    pub id: String,
    /// 규칙 이름
    pub name: String,
    /// 규칙 설명
    pub description: String,
    /// 심각도
    pub severity: Severity,
    /// 검사 대상 필드
    pub field: String,
    /// 본 검사
    pub check: Check,
    /// 메시지 템플릿
    pub message: Option<String>,
    /// 선행 조건 (없으면 무조건 검사)
    pub guard: Option<Guard>,
}

impl RuleSpec {
    /// 선언 규칙을 컴파일합니다.
    ///
    /// # Errors
    /// - 빈 id 또는 빈 field
    /// - 연산자/기준 값 문제 ([`Check::compile`] 참조)
    pub fn compile(&self) -> Result<CompiledRule, ValidatorError> {
        if self.id.is_empty() {
            return Err(ValidatorError::RuleValidation {
                rule_id: "(empty)".to_owned(),
                reason: "rule id must not be empty".to_owned(),
            });
        }
        if self.field.is_empty() {
            return Err(ValidatorError::RuleValidation {
                rule_id: self.id.clone(),
                reason: "rule field must not be empty".to_owned(),
            });
        }

        let check = Check::compile(&self.id, &self.operator, self.threshold.as_ref())?;

        let guard = match &self.condition {
            Some(cond) => {
                if cond.field.is_empty() {
                    return Err(ValidatorError::RuleValidation {
                        rule_id: self.id.clone(),
                        reason: "condition field must not be empty".to_owned(),
                    });
                }
                Some(Guard {
                    field: cond.field.clone(),
                    check: Check::compile(&self.id, &cond.operator, cond.value.as_ref())?,
                })
            }
            None => None,
        };

        Ok(CompiledRule {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_else(|| self.id.clone()),
            description: self.description.clone(),
            severity: self.severity,
            field: self.field.clone(),
            check,
            message: self.message.clone(),
            guard,
        })
    }
}

impl fmt::Display for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {} {}", self.id, self.severity, self.field, self.check.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(operator: &str, threshold: serde_json::Value) -> RuleSpec {
        RuleSpec {
            id: "r1".to_owned(),
            name: None,
            description: String::new(),
            field: "speed".to_owned(),
            operator: operator.to_owned(),
            threshold: Some(threshold),
            severity: Severity::Medium,
            message: None,
            condition: None,
        }
    }

    #[test]
    fn compiles_numeric_operators() {
        assert_eq!(spec(">=", json!(2.5)).compile().unwrap().check, Check::Gte(2.5));
        assert_eq!(spec("<", json!(10)).compile().unwrap().check, Check::Lt(10.0));
    }

    #[test]
    fn numeric_operator_rejects_string_threshold() {
        let err = spec(">", json!("fast")).compile().unwrap_err();
        assert!(matches!(err, ValidatorError::RuleValidation { .. }));
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn compiles_equality_with_any_scalar() {
        assert_eq!(
            spec("==", json!("dock")).compile().unwrap().check,
            Check::Eq(FieldValue::Text("dock".to_owned()))
        );
        assert_eq!(
            spec("!=", json!(true)).compile().unwrap().check,
            Check::Ne(FieldValue::Bool(true))
        );
    }

    #[test]
    fn in_operator_requires_non_empty_scalar_array() {
        let err = spec("in", json!([])).compile().unwrap_err();
        assert!(err.to_string().contains("non-empty"));

        let err = spec("in", json!([{"a": 1}])).compile().unwrap_err();
        assert!(err.to_string().contains("scalars"));

        let ok = spec("not_in", json!(["a", 2])).compile().unwrap();
        assert_eq!(
            ok.check,
            Check::NotIn(vec![FieldValue::Text("a".to_owned()), FieldValue::Number(2.0)])
        );
    }

    #[test]
    fn regex_operator_compiles_pattern_once() {
        let ok = spec("regex", json!("^E[0-9]+$")).compile().unwrap();
        assert!(matches!(ok.check, Check::Matches(_)));

        let err = spec("regex", json!("([")).compile().unwrap_err();
        assert!(matches!(err, ValidatorError::Regex { .. }));
    }

    #[test]
    fn exists_operator_requires_bool() {
        assert_eq!(spec("exists", json!(true)).compile().unwrap().check, Check::Exists(true));
        let err = spec("exists", json!(1)).compile().unwrap_err();
        assert!(err.to_string().contains("boolean"));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = spec("~=", json!(1)).compile().unwrap_err();
        assert!(err.to_string().contains("unknown operator"));
    }

    #[test]
    fn name_defaults_to_id() {
        let rule = spec("==", json!(1)).compile().unwrap();
        assert_eq!(rule.name, "r1");
    }

    #[test]
    fn empty_field_is_rejected() {
        let mut s = spec("==", json!(1));
        s.field = String::new();
        let err = s.compile().unwrap_err();
        assert!(err.to_string().contains("field must not be empty"));
    }

    #[test]
    fn condition_compiles_to_guard() {
        let mut s = spec("<=", json!(2.5));
        s.condition = Some(ConditionSpec {
            field: "zone".to_owned(),
            operator: "==".to_owned(),
            value: Some(json!("dock")),
        });
        let rule = s.compile().unwrap();
        let guard = rule.guard.unwrap();
        assert_eq!(guard.field, "zone");
        assert_eq!(guard.check, Check::Eq(FieldValue::Text("dock".to_owned())));
    }

    #[test]
    fn nested_condition_is_rejected_at_deserialization() {
        let doc = json!({
            "id": "r1",
            "field": "speed",
            "operator": "<=",
            "threshold": 2.5,
            "condition": {
                "field": "zone",
                "operator": "==",
                "value": "dock",
                "condition": { "field": "x", "operator": "exists", "value": true }
            }
        });
        let result: Result<RuleSpec, _> = serde_json::from_value(doc);
        assert!(result.is_err());
    }

    #[test]
    fn threshold_accepts_value_alias() {
        let doc = json!({
            "id": "r1",
            "field": "zone",
            "operator": "==",
            "value": "dock"
        });
        let s: RuleSpec = serde_json::from_value(doc).unwrap();
        assert_eq!(s.threshold, Some(json!("dock")));
    }

    #[test]
    fn compiling_twice_yields_equal_rules() {
        let s = spec("regex", json!("^E[0-9]+$"));
        assert_eq!(s.compile().unwrap(), s.compile().unwrap());
    }
}
