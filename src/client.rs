use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::time::{Duration, SystemTime};

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    sign, SignableBody, SignableRequest, SigningParams, SigningSettings,
};
use aws_sigv4::sign::v4;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use serde_json::Value;

use crate::config::Config;
use crate::error::CurationError;

/// Signing name of the managed search service.
const SIGNING_SERVICE: &str = "es";

/// The remote cluster capability the pipeline runs against. The two
/// listing shapes and the bulk delete are all this job ever needs.
pub trait Cluster {
    async fn aliases(&self) -> Result<HashMap<String, Value>, CurationError>;
    async fn cat_indices(&self) -> Result<String, CurationError>;
    async fn delete_indices(&self, names: &[String]) -> Result<(), CurationError>;
}

/// How requests reach the cluster, chosen once at construction. Direct
/// requests go out untouched; the region-aware mode signs every request
/// with SigV4 using credentials taken from the environment. The pipeline
/// only sees the `Cluster` trait and never branches on this.
#[derive(Debug)]
pub enum ConnectionMode {
    Direct,
    AwsSigV4 {
        region: String,
        credentials: Credentials,
    },
}

impl ConnectionMode {
    fn from_config(config: &Config) -> Result<Self, CurationError> {
        let region = match &config.aws_region {
            Some(region) => region.clone(),
            None => return Ok(ConnectionMode::Direct),
        };

        let access_key = env::var("AWS_ACCESS_KEY_ID").map_err(|_| {
            CurationError::Config(
                "AWS_REGION is set but AWS_ACCESS_KEY_ID is missing".to_string(),
            )
        })?;
        let secret_key = env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| {
            CurationError::Config(
                "AWS_REGION is set but AWS_SECRET_ACCESS_KEY is missing".to_string(),
            )
        })?;
        let session_token = env::var("AWS_SESSION_TOKEN").ok();

        Ok(ConnectionMode::AwsSigV4 {
            region,
            credentials: Credentials::new(access_key, secret_key, session_token, None, "environment"),
        })
    }

    /// Applies the mode to an outgoing request. The signature headers are
    /// added in place; none of the job's requests carry a body.
    pub fn prepare(
        &self,
        request: &mut reqwest::Request,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let ConnectionMode::AwsSigV4 {
            region,
            credentials,
        } = self
        else {
            return Ok(());
        };

        let identity = credentials.clone().into();
        let params: SigningParams = v4::SigningParams::builder()
            .identity(&identity)
            .region(region)
            .name(SIGNING_SERVICE)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()?
            .into();

        let headers = request
            .headers()
            .iter()
            .map(|(name, value)| Ok((name.as_str(), value.to_str()?)))
            .collect::<Result<Vec<_>, reqwest::header::ToStrError>>()?;

        let signable = SignableRequest::new(
            request.method().as_str(),
            request.url().as_str(),
            headers.into_iter(),
            SignableBody::Bytes(&[]),
        )?;

        let (instructions, _signature) = sign(signable, &params)?.into_parts();
        for (name, value) in instructions.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            request.headers_mut().insert(name, HeaderValue::from_str(value)?);
        }

        Ok(())
    }
}

pub struct HttpCluster {
    http: reqwest::Client,
    base: String,
    mode: ConnectionMode,
}

impl HttpCluster {
    pub fn new(config: &Config) -> Result<Self, CurationError> {
        let mode = ConnectionMode::from_config(config)?;
        if let ConnectionMode::AwsSigV4 { region, .. } = &mode {
            info!("signing requests for region {}", region);
        }

        let mut headers = HeaderMap::new();
        if let Some(version) = &config.api_version {
            let accept = format!(
                "application/vnd.elasticsearch+json; compatible-with={}",
                version
            );
            let value = HeaderValue::from_str(&accept).map_err(|e| {
                CurationError::Config(format!("invalid API version {:?}: {}", version, e))
            })?;
            headers.insert(ACCEPT, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        let http = builder.build().map_err(CurationError::query)?;

        Ok(Self {
            http,
            base: config.endpoint.trim_end_matches('/').to_string(),
            mode,
        })
    }

    fn prepared(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Request, Box<dyn Error + Send + Sync>> {
        let mut request = builder.build()?;
        self.mode.prepare(&mut request)?;
        Ok(request)
    }
}

impl Cluster for HttpCluster {
    async fn aliases(&self) -> Result<HashMap<String, Value>, CurationError> {
        let url = format!("{}/_aliases", self.base);
        debug!("GET {}", url);

        let request = self
            .prepared(self.http.get(&url))
            .map_err(CurationError::Query)?;
        let response = self
            .http
            .execute(request)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(CurationError::query)?;

        response.json().await.map_err(CurationError::query)
    }

    async fn cat_indices(&self) -> Result<String, CurationError> {
        let url = format!("{}/_cat/indices?h=index", self.base);
        debug!("GET {}", url);

        let request = self
            .prepared(self.http.get(&url))
            .map_err(CurationError::Query)?;
        let response = self
            .http
            .execute(request)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(CurationError::query)?;

        response.text().await.map_err(CurationError::query)
    }

    async fn delete_indices(&self, names: &[String]) -> Result<(), CurationError> {
        let url = format!("{}/{}", self.base, names.join(","));
        debug!("DELETE {}", url);

        let request = self
            .prepared(self.http.delete(&url))
            .map_err(CurationError::Deletion)?;
        self.http
            .execute(request)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(CurationError::deletion)?;

        Ok(())
    }
}
