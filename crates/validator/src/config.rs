//! 검증 파이프라인 설정

use serde::{Deserialize, Serialize};

use crate::error::ValidatorError;

/// 검증 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// 파서 -> 검증기 채널 용량
    pub channel_capacity: usize,
    /// 줄 단위 입력의 한 줄 최대 크기 (바이트)
    pub max_line_bytes: usize,
    /// 알림 이벤트 채널 용량
    pub alert_channel_capacity: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1_024,
            max_line_bytes: 1024 * 1024,
            alert_channel_capacity: 1_024,
        }
    }
}

impl ValidatorConfig {
    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # Errors
    /// 용량 값이 0이면 에러를 반환합니다.
    pub fn validate(&self) -> Result<(), ValidatorError> {
        if self.channel_capacity == 0 {
            return Err(ValidatorError::Config {
                field: "channel_capacity".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        if self.max_line_bytes == 0 {
            return Err(ValidatorError::Config {
                field: "max_line_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        if self.alert_channel_capacity == 0 {
            return Err(ValidatorError::Config {
                field: "alert_channel_capacity".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        Ok(())
    }
}
