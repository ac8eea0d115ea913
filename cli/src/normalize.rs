#![deny(missing_docs)]

//! # Normalize Command
//!
//! Runs the canonicalization pipeline and writes the canonical model as JSON.

use std::fs;
use std::path::PathBuf;

use canon_core::{canonicalize_with, CanonicalModel, PipelineConfig};

use crate::contract_file::load_contract;
use crate::error::CliResult;

/// Arguments for the normalize command.
#[derive(clap::Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// Path to the contract (.json, .yaml or .yml).
    #[clap(long, env = "CANON_CONTRACT")]
    pub contract: PathBuf,

    /// Output path for the canonical model. Prints to stdout when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Keep internal requests instead of dropping them.
    #[clap(long, env = "CANON_GENERATE_INTERNAL")]
    pub generate_internal: bool,
}

impl NormalizeArgs {
    /// Pipeline settings selected by these arguments.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            generate_internal: self.generate_internal,
            ..PipelineConfig::default()
        }
    }
}

/// Loads the contract and runs the pipeline.
pub fn build_model(args: &NormalizeArgs) -> CliResult<CanonicalModel> {
    let contract = load_contract(&args.contract)?;
    Ok(canonicalize_with(&contract, &args.pipeline_config())?)
}

/// Executes the normalize command.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &NormalizeArgs) -> CliResult<()> {
    let model = build_model(args)?;
    let json = serde_json::to_string_pretty(&model)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)?;
            tracing::info!(
                output = %path.display(),
                requests = model.requests.len(),
                types = model.types.len(),
                "wrote canonical model"
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CONTRACT: &str = r#"{
      "requests": [
        {
          "name": "com.example.spectrads3.job.GetJobRequestHandler",
          "http_verb": "GET",
          "classification": "SpectraStyle",
          "action": "SHOW",
          "resource": "JOB",
          "resource_kind": "NON_SINGLETON",
          "include_in_path": true,
          "response_codes": [{"code": 200, "payloads": [{"type": "com.example.Job"}]}]
        },
        {
          "name": "com.example.spectrainternal.GetCacheStateRequestHandler",
          "http_verb": "GET",
          "classification": "SpectraInternal"
        }
      ],
      "types": {
        "com.example.Job": {"name": "com.example.Job", "elements": [{"name": "Id", "type": "java.util.UUID"}]},
        "com.example.Unused": {"name": "com.example.Unused"}
      }
    }"#;

    #[test]
    fn test_execute_writes_model() {
        let dir = tempdir().unwrap();
        let contract = dir.path().join("contract.json");
        let output = dir.path().join("out/model.json");
        fs::write(&contract, CONTRACT).unwrap();

        let args = NormalizeArgs {
            contract,
            output: Some(output.clone()),
            generate_internal: false,
        };
        execute(&args).unwrap();

        let model: CanonicalModel =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(model.requests.len(), 1);
        assert_eq!(model.requests[0].name, "GetJobSpectraS3Request");
        assert_eq!(
            model.requests[0].arguments.as_ref().unwrap().path[0].name,
            "JobId"
        );
        assert!(model.types.contains_key("com.example.Job"));
        assert!(!model.types.contains_key("com.example.Unused"));
    }

    #[test]
    fn test_generate_internal_keeps_requests() {
        let dir = tempdir().unwrap();
        let contract = dir.path().join("contract.json");
        fs::write(&contract, CONTRACT).unwrap();

        let args = NormalizeArgs {
            contract,
            output: None,
            generate_internal: true,
        };
        let model = build_model(&args).unwrap();
        assert_eq!(model.requests.len(), 2);
    }

    #[test]
    fn test_execute_reports_pipeline_error() {
        let dir = tempdir().unwrap();
        let contract = dir.path().join("contract.json");
        fs::write(
            &contract,
            r#"{"requests":[{"name":"a.GetPoolRequestHandler","http_verb":"GET","classification":"AmazonStyle",
               "response_codes":[{"code":200,"payloads":[{"type":"a.Pool"},{"type":"a.PoolBean"}]}]}]}"#,
        )
        .unwrap();

        let args = NormalizeArgs {
            contract,
            output: None,
            generate_internal: false,
        };
        let err = execute(&args).unwrap_err();
        assert!(err.to_string().contains("GetPoolRequest"));
    }
}
