use log::debug;

use crate::client::Cluster;
use crate::config::SourceKind;
use crate::error::CurationError;

impl SourceKind {
    /// Normalizes either remote listing shape into a flat name list.
    pub async fn list<C: Cluster>(&self, client: &C) -> Result<Vec<String>, CurationError> {
        let names = match self {
            SourceKind::Aliases => client.aliases().await?.into_keys().collect(),
            SourceKind::Catalog => {
                let body = client.cat_indices().await?;
                // A trailing newline splits into an empty final line. That
                // must never reach a delete request as a phantom name.
                body.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            }
        };

        debug!("listed {} indices", names.len());
        Ok(names)
    }
}
