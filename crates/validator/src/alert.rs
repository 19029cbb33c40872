//! 알림 싱크 -- 위반 발생 즉시 통지
//!
//! 검증기는 위반 하나마다 싱크를 동기적으로 호출합니다.
//! 배치 없음, 순서 보존. 싱크 구현이 알림의 표현 방식을 결정하고
//! 검증기와 규칙 엔진은 I/O를 수행하지 않습니다.

use chrono::{DateTime, Utc};
use metrics::counter;
use tokio::sync::mpsc;
use uuid::Uuid;
use vigil_core::metrics::VALIDATOR_ALERTS_DROPPED_TOTAL;
use vigil_core::types::Violation;

/// 알림 싱크
///
/// `notify`는 위반이 상태에 반영된 직후, 다음 엔트리가 처리되기 전에
/// 호출됩니다.
pub trait AlertSink: Send {
    /// 위반 하나를 통지받습니다.
    fn notify(&mut self, violation: &Violation);
}

/// 채널로 전달되는 알림 이벤트
#[derive(Debug, Clone)]
pub struct AlertEvent {
    /// 이벤트 고유 ID
    pub id: Uuid,
    /// 발생한 위반
    pub violation: Violation,
    /// 이벤트 생성 시각
    pub created_at: DateTime<Utc>,
}

impl AlertEvent {
    /// 위반으로부터 새 이벤트를 생성합니다.
    pub fn new(violation: Violation) -> Self {
        Self {
            id: Uuid::new_v4(),
            violation,
            created_at: Utc::now(),
        }
    }
}

/// 채널 알림 싱크
///
/// 위반을 [`AlertEvent`]로 감싸 바운디드 채널에 전송합니다.
/// 채널이 가득 차면 이벤트를 드롭하고 드롭 수를 집계합니다.
/// 검증 스트림은 느린 소비자 때문에 막히지 않습니다.
pub struct ChannelAlertSink {
    tx: mpsc::Sender<AlertEvent>,
    dropped: u64,
}

impl ChannelAlertSink {
    /// 송신 핸들로 싱크를 생성합니다.
    pub fn new(tx: mpsc::Sender<AlertEvent>) -> Self {
        Self { tx, dropped: 0 }
    }

    /// 채널 포화로 드롭된 이벤트 수
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl AlertSink for ChannelAlertSink {
    fn notify(&mut self, violation: &Violation) {
        let event = AlertEvent::new(violation.clone());
        if let Err(e) = self.tx.try_send(event) {
            self.dropped += 1;
            counter!(VALIDATOR_ALERTS_DROPPED_TOTAL).increment(1);
            tracing::warn!(
                rule_id = %violation.rule_id,
                dropped = self.dropped,
                error = %e,
                "alert channel full, event dropped"
            );
        }
    }
}

/// 메모리 알림 싱크 -- 수신한 위반을 순서대로 보관합니다.
///
/// 테스트와 임베딩 용도입니다.
#[derive(Debug, Default)]
pub struct MemoryAlertSink {
    violations: Vec<Violation>,
}

impl MemoryAlertSink {
    /// 빈 싱크를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 수신한 위반 목록
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl AlertSink for MemoryAlertSink {
    fn notify(&mut self, violation: &Violation) {
        self.violations.push(violation.clone());
    }
}

/// 무시 싱크 -- 모든 알림을 버립니다.
#[derive(Debug, Default)]
pub struct NullAlertSink;

impl AlertSink for NullAlertSink {
    fn notify(&mut self, _violation: &Violation) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::types::{Severity, Violation};

    fn violation(rule_id: &str) -> Violation {
        Violation {
            rule_id: rule_id.to_owned(),
            rule_name: rule_id.to_owned(),
            severity: Severity::High,
            message: "test".to_owned(),
            robot_id: "r1".to_owned(),
            timestamp: "2026-01-01T00:00:00Z".to_owned(),
            field: "speed".to_owned(),
            actual: None,
            expected: "<= 1".to_owned(),
            log_index: 0,
        }
    }

    #[test]
    fn memory_sink_preserves_order() {
        let mut sink = MemoryAlertSink::new();
        sink.notify(&violation("a"));
        sink.notify(&violation("b"));
        let ids: Vec<&str> = sink.violations().iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn channel_sink_delivers_events() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut sink = ChannelAlertSink::new(tx);
        sink.notify(&violation("a"));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.violation.rule_id, "a");
        assert_eq!(sink.dropped(), 0);
    }

    #[tokio::test]
    async fn channel_sink_counts_drops_when_full() {
        let (tx, _rx) = mpsc::channel(1);
        let mut sink = ChannelAlertSink::new(tx);
        sink.notify(&violation("a"));
        sink.notify(&violation("b"));
        assert_eq!(sink.dropped(), 1);
    }
}
