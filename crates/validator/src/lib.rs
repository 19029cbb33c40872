#![doc = include_str!("../README.md")]

pub mod alert;
pub mod config;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod rule;
pub mod validator;

// --- 주요 타입 re-export ---

pub use alert::{AlertEvent, AlertSink, ChannelAlertSink, MemoryAlertSink, NullAlertSink};
pub use config::ValidatorConfig;
pub use error::ValidatorError;
pub use parser::{LineParser, ParsedRecord, parse_array};
pub use pipeline::{ValidationPipeline, ValidationPipelineBuilder};
pub use report::{Reporter, ValidationReport};
pub use rule::{Check, CompiledRule, RuleEngine, RuleLoader, RuleSpec};
pub use validator::{StreamValidator, ValidationState};
