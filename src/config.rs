use std::collections::HashSet;
use std::fs;

use clap::{Args, ValueEnum};
use regex::Regex;
use serde::Deserialize;

use crate::error::CurationError;
use crate::retention::RetentionPolicy;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_INDEX_AGE: i64 = 14;
pub const DEFAULT_EXCLUDED: &str = ".kibana";

/// Values arriving through flags or the environment. Everything is
/// optional here; `Config::resolve` fills the gaps from the config file
/// and the defaults.
#[derive(Debug, Default, Args)]
pub struct Settings {
    /// Optional YAML configuration file
    #[clap(short, long)]
    pub config: Option<String>,
    /// Cluster endpoint URL, e.g. http://localhost:9200
    #[clap(long, env = "ENDPOINT")]
    pub endpoint: Option<String>,
    /// Protocol version hint sent with every request
    #[clap(long, env = "API_VERSION")]
    pub api_version: Option<String>,
    /// Region of a cloud-hosted cluster; enables the region-aware connection mode
    #[clap(long, env = "AWS_REGION")]
    pub aws_region: Option<String>,
    /// Upper bound of index names per delete request, 0 disables batching
    #[clap(long, env = "BATCH_SIZE")]
    pub batch_size: Option<usize>,
    /// Space or comma separated index names that are never deleted
    #[clap(long, env = "EXCLUDED_INDICES")]
    pub excluded_indices: Option<String>,
    /// Indices stamped more than this many days in the past are deleted
    #[clap(long, env = "MAX_INDEX_AGE")]
    pub max_index_age: Option<i64>,
    /// Indices stamped more than this many days in the future are deleted, 0 disables
    #[clap(long, env = "GRACE_FUTURE_DAYS")]
    pub grace_future_days: Option<i64>,
    /// Request timeout in milliseconds
    #[clap(long, env = "ES_TIMEOUT")]
    pub timeout: Option<u64>,
    /// Which listing endpoint provides the index names
    #[clap(long, value_enum)]
    pub source: Option<SourceKind>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub api_version: Option<String>,
    pub aws_region: Option<String>,
    pub batch_size: Option<usize>,
    pub excluded_indices: Option<Vec<String>>,
    pub max_index_age: Option<i64>,
    pub grace_future_days: Option<i64>,
    pub timeout_ms: Option<u64>,
    pub source: Option<SourceKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Key set of the alias mapping
    Aliases,
    /// Newline-delimited catalog listing
    Catalog,
}

/// One invocation's immutable configuration, resolved before anything
/// touches the cluster and passed by reference from there on.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub api_version: Option<String>,
    pub aws_region: Option<String>,
    pub batch_size: usize,
    pub excluded_indices: HashSet<String>,
    pub max_index_age: i64,
    pub grace_future_days: i64,
    pub timeout_ms: Option<u64>,
    pub source: SourceKind,
}

impl Config {
    pub fn resolve(settings: &Settings) -> Result<Self, CurationError> {
        let file = match &settings.config {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|e| {
                    CurationError::Config(format!("unable to read {}: {}", path, e))
                })?;
                serde_yaml::from_str(&raw).map_err(|e| {
                    CurationError::Config(format!("unable to parse {}: {}", path, e))
                })?
            }
            None => FileConfig::default(),
        };

        Config::from_parts(settings, file)
    }

    /// Flag/environment values win over the file, the file over the
    /// defaults.
    pub fn from_parts(settings: &Settings, file: FileConfig) -> Result<Self, CurationError> {
        let endpoint = settings
            .endpoint
            .clone()
            .or(file.endpoint)
            .ok_or_else(|| CurationError::Config("no endpoint configured".to_string()))?;

        let excluded_indices = match &settings.excluded_indices {
            Some(raw) => split_excluded(raw),
            None => match file.excluded_indices {
                Some(names) => names.into_iter().collect(),
                None => HashSet::from([DEFAULT_EXCLUDED.to_string()]),
            },
        };

        let max_index_age = settings
            .max_index_age
            .or(file.max_index_age)
            .unwrap_or(DEFAULT_MAX_INDEX_AGE);
        if max_index_age < 0 {
            return Err(CurationError::Config(format!(
                "MAX_INDEX_AGE must not be negative, got {}",
                max_index_age
            )));
        }

        let grace_future_days = settings
            .grace_future_days
            .or(file.grace_future_days)
            .unwrap_or(0);
        if grace_future_days < 0 {
            return Err(CurationError::Config(format!(
                "GRACE_FUTURE_DAYS must not be negative, got {}",
                grace_future_days
            )));
        }

        Ok(Config {
            endpoint,
            api_version: settings.api_version.clone().or(file.api_version),
            aws_region: settings.aws_region.clone().or(file.aws_region),
            batch_size: settings
                .batch_size
                .or(file.batch_size)
                .unwrap_or(DEFAULT_BATCH_SIZE),
            excluded_indices,
            max_index_age,
            grace_future_days,
            timeout_ms: settings.timeout.or(file.timeout_ms),
            source: settings.source.or(file.source).unwrap_or(SourceKind::Aliases),
        })
    }

    pub fn policy(&self) -> RetentionPolicy {
        RetentionPolicy {
            excluded: self.excluded_indices.clone(),
            max_age_days: self.max_index_age,
            grace_future_days: self.grace_future_days,
        }
    }
}

fn split_excluded(raw: &str) -> HashSet<String> {
    let re = Regex::new(r"[ ,]+").unwrap();
    re.split(raw)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}
