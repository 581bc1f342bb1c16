use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::client::Cluster;
use crate::error::CurationError;

/// In-memory cluster double. Records every delete batch it receives and
/// can be told to reject deletes.
#[derive(Default)]
pub struct FakeCluster {
    aliases: HashMap<String, Value>,
    catalog: String,
    fail_deletes: bool,
    deleted: Mutex<Vec<Vec<String>>>,
}

impl FakeCluster {
    pub fn with_aliases(names: &[&str]) -> Self {
        Self {
            aliases: names
                .iter()
                .map(|n| (n.to_string(), json!({ "aliases": {} })))
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_catalog(body: &str) -> Self {
        Self {
            catalog: body.to_string(),
            ..Self::default()
        }
    }

    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn deleted(&self) -> Vec<Vec<String>> {
        self.deleted.lock().unwrap().clone()
    }
}

impl Cluster for FakeCluster {
    async fn aliases(&self) -> Result<HashMap<String, Value>, CurationError> {
        Ok(self.aliases.clone())
    }

    async fn cat_indices(&self) -> Result<String, CurationError> {
        Ok(self.catalog.clone())
    }

    async fn delete_indices(&self, names: &[String]) -> Result<(), CurationError> {
        if self.fail_deletes {
            return Err(CurationError::deletion(io::Error::other("delete rejected")));
        }

        self.deleted.lock().unwrap().push(names.to_vec());
        Ok(())
    }
}

/// Date-stamped names, one per day of January 2020.
pub fn names(count: usize) -> Vec<String> {
    (1..=count).map(|day| format!("2020.01.{:02}", day)).collect()
}
