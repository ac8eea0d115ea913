#![deny(missing_docs)]

//! # Inspect Command
//!
//! Prints one row per canonical request: its name, shape and constructor
//! arguments. Handy for reviewing classifier output without a backend.

use std::path::PathBuf;

use canon_core::{canonicalize_with, CanonicalModel, PipelineConfig, Request, Shape};
use serde::Serialize;

use crate::contract_file::load_contract;
use crate::error::CliResult;

/// Output format for the request summary.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InspectFormat {
    /// Aligned plain text.
    #[default]
    Text,
    /// JSON array.
    Json,
    /// YAML sequence.
    Yaml,
}

/// Arguments for the inspect command.
#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the contract (.json, .yaml or .yml).
    #[clap(long, env = "CANON_CONTRACT")]
    pub contract: PathBuf,

    /// Keep internal requests instead of dropping them.
    #[clap(long, env = "CANON_GENERATE_INTERNAL")]
    pub generate_internal: bool,

    /// Summary format.
    #[clap(long, value_enum, default_value_t = InspectFormat::Text)]
    pub format: InspectFormat,
}

/// One summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSummary {
    /// Canonical request name.
    pub name: String,
    /// Assigned shape.
    pub shape: Option<Shape>,
    /// Constructor arguments as `Name: Type`.
    pub constructor: Vec<String>,
}

impl From<&Request> for RequestSummary {
    fn from(request: &Request) -> Self {
        let constructor = request
            .arguments
            .as_ref()
            .map(|args| {
                args.constructor
                    .iter()
                    .map(|a| format!("{}: {}", a.name, a.ty))
                    .collect()
            })
            .unwrap_or_default();
        RequestSummary {
            name: request.name.clone(),
            shape: request.shape,
            constructor,
        }
    }
}

/// Summarizes every request of `model`, in model order.
pub fn summarize(model: &CanonicalModel) -> Vec<RequestSummary> {
    model.requests.iter().map(RequestSummary::from).collect()
}

/// Renders the summary rows in `format`.
pub fn render(rows: &[RequestSummary], format: InspectFormat) -> CliResult<String> {
    match format {
        InspectFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        InspectFormat::Yaml => Ok(serde_yaml::to_string(rows)?),
        InspectFormat::Text => {
            let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
            let lines: Vec<String> = rows
                .iter()
                .map(|r| {
                    let shape = r.shape.map(|s| format!("{:?}", s)).unwrap_or_default();
                    format!(
                        "{:<width$}  {:<22}  ({})",
                        r.name,
                        shape,
                        r.constructor.join(", "),
                        width = width
                    )
                })
                .collect();
            Ok(lines.join("\n"))
        }
    }
}

/// Executes the inspect command.
pub fn execute(args: &InspectArgs) -> CliResult<()> {
    let contract = load_contract(&args.contract)?;
    let config = PipelineConfig {
        generate_internal: args.generate_internal,
        ..PipelineConfig::default()
    };
    let model = canonicalize_with(&contract, &config)?;
    let rows = summarize(&model);
    println!("{}", render(&rows, args.format)?);
    tracing::debug!(requests = rows.len(), "inspected contract");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canon_core::{Argument, ArgumentLists, Classification, HttpVerb};

    fn summary_model() -> CanonicalModel {
        let mut head = Request::new(
            "HeadBucketRequest",
            HttpVerb::Head,
            Classification::AmazonStyle,
        );
        head.shape = Some(Shape::Basic);
        head.arguments = Some(ArgumentLists {
            constructor: vec![Argument::new("BucketName", "String")],
            ..ArgumentLists::default()
        });
        let mut get = Request::new(
            "GetJobSpectraS3Request",
            HttpVerb::Get,
            Classification::SpectraStyle,
        );
        get.shape = Some(Shape::Basic);
        CanonicalModel {
            requests: vec![head, get],
            types: Default::default(),
        }
    }

    #[test]
    fn test_summarize_keeps_order() {
        let rows = summarize(&summary_model());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "HeadBucketRequest");
        assert_eq!(rows[0].constructor, vec!["BucketName: String".to_string()]);
        assert!(rows[1].constructor.is_empty());
    }

    #[test]
    fn test_render_text() {
        let rows = summarize(&summary_model());
        let text = render(&rows, InspectFormat::Text).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("HeadBucketRequest "));
        assert!(lines[0].ends_with("(BucketName: String)"));
        assert!(lines[1].contains("Basic"));
    }

    #[test]
    fn test_render_json() {
        let rows = summarize(&summary_model());
        let json = render(&rows, InspectFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[1]["name"], "GetJobSpectraS3Request");
    }
}
