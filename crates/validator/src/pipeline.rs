//! 파이프라인 오케스트레이션 -- 입력 읽기/파싱/검증의 전체 흐름
//!
//! # 내부 아키텍처
//! ```text
//! Reader task -> LineParser -> mpsc -> StreamValidator -> AlertSink
//! ```
//!
//! 생산자 태스크가 줄을 읽어 파싱하고, 소비자는 엄격히 순차적으로
//! 엔트리를 검증합니다. 한 엔트리의 알림 전달까지 끝난 뒤에야
//! 다음 엔트리가 처리됩니다.

use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::alert::AlertSink;
use crate::config::ValidatorConfig;
use crate::error::ValidatorError;
use crate::parser::{LineParser, ParsedRecord, parse_array};
use crate::rule::{CompiledRule, RuleEngine};
use crate::validator::{StreamValidator, ValidationState};

/// 검증 파이프라인 빌더
///
/// 규칙 집합은 필수이며, 싱크를 지정하지 않으면
/// [`NullAlertSink`](crate::alert::NullAlertSink)가 쓰입니다.
pub struct ValidationPipelineBuilder {
    config: ValidatorConfig,
    rules: Option<Vec<CompiledRule>>,
    sink: Option<Box<dyn AlertSink>>,
}

impl ValidationPipelineBuilder {
    /// 기본 설정으로 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: ValidatorConfig::default(),
            rules: None,
            sink: None,
        }
    }

    /// 설정을 지정합니다.
    #[must_use]
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// 컴파일된 규칙 집합을 지정합니다.
    #[must_use]
    pub fn rules(mut self, rules: Vec<CompiledRule>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// 알림 싱크를 지정합니다.
    #[must_use]
    pub fn sink(mut self, sink: Box<dyn AlertSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 파이프라인을 생성합니다.
    ///
    /// # Errors
    /// 규칙 집합이 지정되지 않았거나 설정이 유효하지 않으면 실패합니다.
    pub fn build(self) -> Result<ValidationPipeline, ValidatorError> {
        self.config.validate()?;

        let rules = self.rules.ok_or_else(|| ValidatorError::Config {
            field: "rules".to_owned(),
            reason: "a compiled rule set is required".to_owned(),
        })?;
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(crate::alert::NullAlertSink));

        tracing::info!(rule_count = rules.len(), "validation pipeline built");

        Ok(ValidationPipeline {
            validator: StreamValidator::new(RuleEngine::new(rules), sink),
            config: self.config,
        })
    }
}

impl Default for ValidationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 검증 파이프라인
///
/// 입력 전체를 한 번에 받는 배열 모드와, 줄 단위 스트리밍 모드를
/// 지원합니다. 실행 도중 에러가 나도 그때까지의 집계 상태는
/// 유효한 부분 결과로 남습니다.
pub struct ValidationPipeline {
    validator: StreamValidator,
    config: ValidatorConfig,
}

impl std::fmt::Debug for ValidationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ValidationPipeline {
    /// 현재까지의 집계 상태
    pub fn state(&self) -> &ValidationState {
        self.validator.state()
    }

    /// JSON 배열 문서 파일을 읽어 전체를 검증합니다.
    ///
    /// # Errors
    /// - 파일을 읽을 수 없는 경우
    /// - 문서가 유효한 JSON 배열이 아닌 경우
    pub async fn run_array_file(&mut self, path: impl AsRef<Path>) -> Result<(), ValidatorError> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        let records = parse_array(&text)?;

        for record in records {
            self.ingest_record(record)?;
        }
        Ok(())
    }

    /// 줄 단위 JSON 스트림을 검증합니다.
    ///
    /// 생산자 태스크가 줄을 읽어 바운디드 채널로 전송하고,
    /// 이 메서드는 수신 순서 그대로 순차 검증합니다.
    ///
    /// # Errors
    /// 스트림 도중 I/O 에러가 나면 반환합니다. 그때까지 수집된
    /// 상태는 유효하며 finalize로 부분 보고서를 만들 수 있습니다.
    pub async fn run_lines<R>(&mut self, reader: R) -> Result<(), ValidatorError>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<ParsedRecord>(self.config.channel_capacity);
        let max_line_bytes = self.config.max_line_bytes;

        let producer = tokio::spawn(async move {
            let mut parser = LineParser::new(max_line_bytes);
            let mut lines = reader.lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(record) = parser.parse_line(&line)
                            && tx.send(record).await.is_err()
                        {
                            // 소비자가 사라짐
                            return Ok(());
                        }
                    }
                    Ok(None) => return Ok(()),
                    Err(e) => return Err(e),
                }
            }
        });

        while let Some(record) = rx.recv().await {
            self.ingest_record(record)?;
        }

        producer
            .await
            .map_err(|e| ValidatorError::Channel(format!("reader task failed: {e}")))??;
        Ok(())
    }

    fn ingest_record(&mut self, record: ParsedRecord) -> Result<(), ValidatorError> {
        match record {
            ParsedRecord::Entry(entry) => self.validator.ingest(&entry),
            ParsedRecord::Failed { index, reason } => {
                self.validator.ingest_parse_failure(index, &reason)
            }
        }
    }

    /// 스트림을 닫고 최종 상태를 반환합니다.
    ///
    /// # Errors
    /// 이미 finalize된 경우 에러를 반환합니다.
    pub fn finalize(&mut self) -> Result<ValidationState, ValidatorError> {
        self.validator.finalize()
    }
}
