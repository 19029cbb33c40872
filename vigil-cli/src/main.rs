//! vigil -- 로봇 로그 안전 검증 CLI
//!
//! 규칙 로딩 → 입력 검증 → 실시간 알림 → 요약/보고서 출력의
//! 전체 흐름을 담당합니다. 위반이 발견되어도 종료 코드는 0이며,
//! 운영 실패(규칙 문서 오류, 입력 불가)만 0이 아닌 코드로 끝납니다.

mod alert;
mod cli;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vigil_validator::{
    Reporter, RuleLoader, ValidationPipelineBuilder, ValidationReport,
};

use crate::alert::ConsoleAlertSink;
use crate::cli::Cli;
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 알림과 로그는 stderr, 요약/보고서는 stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        eprintln!("vigil: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    vigil_core::metrics::describe_all();

    let rules = RuleLoader::load_file(&cli.rules).await?;
    tracing::info!(count = rules.len(), "rules compiled");

    let sink = ConsoleAlertSink::new(cli.verbose, cli.quiet, cli.max_violations);
    let mut pipeline = ValidationPipelineBuilder::new()
        .rules(rules)
        .sink(Box::new(sink))
        .build()?;

    // 실행이 도중에 실패해도 그때까지의 부분 상태로 보고서를 만든다
    let run_result = match (&cli.input, cli.stream) {
        (Some(path), false) => pipeline.run_array_file(path).await,
        _ => {
            let reader = tokio::io::BufReader::new(tokio::io::stdin());
            pipeline.run_lines(reader).await
        }
    };

    let state = pipeline.finalize()?;
    let report = ValidationReport::from_state(&state);

    if !cli.quiet {
        OutputWriter::new(cli.format).render(&report)?;
    }

    if let Some(path) = &cli.output {
        Reporter::write_json(&report, path).await?;
        if !cli.quiet {
            println!("report written to {}", path.display());
        }
    }

    run_result?;
    Ok(())
}
