//! # Contract Files
//!
//! Reads a contract from disk, choosing the format by file extension.

use std::fs;
use std::path::Path;

use canon_core::Contract;

use crate::error::{CliError, CliResult};

/// Supported on-disk contract formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl ContractFormat {
    /// Infers the format from the path's extension.
    pub fn from_path(path: &Path) -> CliResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(ContractFormat::Json),
            Some("yaml") | Some("yml") => Ok(ContractFormat::Yaml),
            _ => Err(CliError::General(format!(
                "Unsupported contract extension: {:?} (expected .json, .yaml or .yml)",
                path
            ))),
        }
    }
}

/// Loads and validates the contract at `path`.
pub fn load_contract(path: &Path) -> CliResult<Contract> {
    if !path.exists() {
        return Err(CliError::General(format!(
            "Contract file not found: {:?}",
            path
        )));
    }
    let format = ContractFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), ?format, "loading contract");

    let contract = match format {
        ContractFormat::Json => Contract::from_json_str(&content)?,
        ContractFormat::Yaml => Contract::from_yaml_str(&content)?,
    };
    Ok(contract)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ContractFormat::from_path(&PathBuf::from("c.JSON")).unwrap(),
            ContractFormat::Json
        );
        assert_eq!(
            ContractFormat::from_path(&PathBuf::from("c.yml")).unwrap(),
            ContractFormat::Yaml
        );
        assert!(ContractFormat::from_path(&PathBuf::from("c.xml")).is_err());
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contract.yaml");
        fs::write(
            &path,
            "requests:\n  - name: a.GetServiceRequestHandler\n    http_verb: GET\n    classification: AmazonStyle\n",
        )
        .unwrap();
        let contract = load_contract(&path).unwrap();
        assert_eq!(contract.requests.len(), 1);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempdir().unwrap();
        let err = load_contract(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Contract file not found"));
    }
}
