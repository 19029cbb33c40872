//! 연산자 평가 -- 순수 함수 계층
//!
//! 하나의 검사를 하나의 필드 값에 적용한 결과를 계산합니다.
//! 부재 필드와 타입 불일치는 `exists`를 제외한 모든 연산자에서
//! 위반이 아니라 [`Outcome::Skipped`]입니다.

use vigil_core::types::FieldValue;

use super::types::Check;

/// 검사 평가 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 검사를 만족함
    Satisfied,
    /// 검사를 위반함
    Violated,
    /// 필드 부재 또는 타입 불일치로 검사 불가
    Skipped,
}

impl Outcome {
    fn from_bool(satisfied: bool) -> Self {
        if satisfied { Self::Satisfied } else { Self::Violated }
    }
}

/// 검사를 필드 값에 적용합니다.
///
/// 전체 함수(total function)입니다. 어떤 입력에도 패닉하지 않습니다.
pub fn evaluate(check: &Check, value: Option<&FieldValue>) -> Outcome {
    // exists만 부재를 직접 검사한다
    if let Check::Exists(required) = check {
        return Outcome::from_bool(value.is_some() == *required);
    }

    let Some(value) = value else {
        return Outcome::Skipped;
    };

    match check {
        Check::Gte(n) => numeric(value, |v| v >= *n),
        Check::Gt(n) => numeric(value, |v| v > *n),
        Check::Lte(n) => numeric(value, |v| v <= *n),
        Check::Lt(n) => numeric(value, |v| v < *n),
        Check::Eq(expected) => scalar_eq(value, expected).map_or(Outcome::Skipped, Outcome::from_bool),
        Check::Ne(expected) => {
            scalar_eq(value, expected).map_or(Outcome::Skipped, |eq| Outcome::from_bool(!eq))
        }
        Check::In(set) => Outcome::from_bool(set.contains(value)),
        Check::NotIn(set) => Outcome::from_bool(!set.contains(value)),
        Check::Matches(re) => text(value, |s| re.is_match(s)),
        Check::NotMatches(re) => text(value, |s| !re.is_match(s)),
        Check::Contains(sub) => text(value, |s| s.contains(sub.as_str())),
        Check::StartsWith(prefix) => text(value, |s| s.starts_with(prefix.as_str())),
        Check::EndsWith(suffix) => text(value, |s| s.ends_with(suffix.as_str())),
        Check::Exists(_) => unreachable!("handled above"),
    }
}

fn numeric(value: &FieldValue, pred: impl Fn(f64) -> bool) -> Outcome {
    match value.as_number() {
        Some(n) => Outcome::from_bool(pred(n)),
        None => Outcome::Skipped,
    }
}

fn text(value: &FieldValue, pred: impl Fn(&str) -> bool) -> Outcome {
    match value.as_text() {
        Some(s) => Outcome::from_bool(pred(s)),
        None => Outcome::Skipped,
    }
}

/// 같은 타입의 스칼라끼리만 동등 비교합니다. 타입이 다르면 `None`.
fn scalar_eq(a: &FieldValue, b: &FieldValue) -> Option<bool> {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => Some(x == y),
        (FieldValue::Text(x), FieldValue::Text(y)) => Some(x == y),
        (FieldValue::Bool(x), FieldValue::Bool(y)) => Some(x == y),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn num(n: f64) -> FieldValue {
        FieldValue::Number(n)
    }

    fn txt(s: &str) -> FieldValue {
        FieldValue::Text(s.to_owned())
    }

    #[test]
    fn numeric_comparisons() {
        assert_eq!(evaluate(&Check::Gte(2.5), Some(&num(2.5))), Outcome::Satisfied);
        assert_eq!(evaluate(&Check::Gte(2.5), Some(&num(2.4))), Outcome::Violated);
        assert_eq!(evaluate(&Check::Lt(0.0), Some(&num(-1.0))), Outcome::Satisfied);
        assert_eq!(evaluate(&Check::Gt(1.0), Some(&num(1.0))), Outcome::Violated);
    }

    #[test]
    fn missing_field_is_skipped_for_every_operator_except_exists() {
        let checks = [
            Check::Gte(1.0),
            Check::Eq(num(1.0)),
            Check::In(vec![num(1.0)]),
            Check::Matches(Regex::new("a").unwrap()),
            Check::Contains("a".to_owned()),
        ];
        for check in &checks {
            assert_eq!(evaluate(check, None), Outcome::Skipped);
        }
    }

    #[test]
    fn type_mismatch_is_skipped_not_violated() {
        assert_eq!(evaluate(&Check::Gte(1.0), Some(&txt("fast"))), Outcome::Skipped);
        assert_eq!(evaluate(&Check::Matches(Regex::new("a").unwrap()), Some(&num(3.0))), Outcome::Skipped);
        assert_eq!(evaluate(&Check::Eq(num(1.0)), Some(&txt("1"))), Outcome::Skipped);
    }

    #[test]
    fn equality_and_inequality() {
        assert_eq!(evaluate(&Check::Eq(txt("dock")), Some(&txt("dock"))), Outcome::Satisfied);
        assert_eq!(evaluate(&Check::Eq(txt("dock")), Some(&txt("lab"))), Outcome::Violated);
        assert_eq!(evaluate(&Check::Ne(txt("dock")), Some(&txt("lab"))), Outcome::Satisfied);
        assert_eq!(
            evaluate(&Check::Ne(FieldValue::Bool(true)), Some(&FieldValue::Bool(true))),
            Outcome::Violated
        );
    }

    #[test]
    fn set_membership() {
        let set = vec![txt("idle"), txt("moving")];
        assert_eq!(evaluate(&Check::In(set.clone()), Some(&txt("idle"))), Outcome::Satisfied);
        assert_eq!(evaluate(&Check::In(set.clone()), Some(&txt("error"))), Outcome::Violated);
        assert_eq!(evaluate(&Check::NotIn(set.clone()), Some(&txt("error"))), Outcome::Satisfied);
        assert_eq!(evaluate(&Check::NotIn(set), Some(&txt("idle"))), Outcome::Violated);
    }

    #[test]
    fn regex_polarity() {
        let re = Regex::new("^E[0-9]+$").unwrap();
        assert_eq!(evaluate(&Check::Matches(re.clone()), Some(&txt("E42"))), Outcome::Satisfied);
        assert_eq!(evaluate(&Check::Matches(re.clone()), Some(&txt("ok"))), Outcome::Violated);
        assert_eq!(evaluate(&Check::NotMatches(re.clone()), Some(&txt("ok"))), Outcome::Satisfied);
        assert_eq!(evaluate(&Check::NotMatches(re), Some(&txt("E42"))), Outcome::Violated);
    }

    #[test]
    fn exists_checks_presence_only() {
        assert_eq!(evaluate(&Check::Exists(true), Some(&num(0.0))), Outcome::Satisfied);
        assert_eq!(evaluate(&Check::Exists(true), None), Outcome::Violated);
        assert_eq!(evaluate(&Check::Exists(false), None), Outcome::Satisfied);
        assert_eq!(evaluate(&Check::Exists(false), Some(&txt(""))), Outcome::Violated);
    }

    #[test]
    fn string_operators_match_substrings() {
        assert_eq!(
            evaluate(&Check::Contains("err".to_owned()), Some(&txt("motor err"))),
            Outcome::Satisfied
        );
        assert_eq!(
            evaluate(&Check::Contains("err".to_owned()), Some(&txt("ok"))),
            Outcome::Violated
        );
        assert_eq!(
            evaluate(&Check::StartsWith("WARN".to_owned()), Some(&txt("WARN: hot"))),
            Outcome::Satisfied
        );
        assert_eq!(
            evaluate(&Check::EndsWith(".log".to_owned()), Some(&txt("run.txt"))),
            Outcome::Violated
        );
    }
}
