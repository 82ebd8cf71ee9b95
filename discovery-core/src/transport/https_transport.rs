use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::{Certificate, Client};
use tracing::debug;
use url::Url;

use crate::config::DiscoveryConfig;
use crate::service::ServiceRef;
use crate::transport::{EndpointsTransport, TransportError};

/// Talks to the api server over https, authenticating with the service
/// account bearer token.
#[derive(Clone)]
pub struct HttpsTransport {
    client: Client,
    master: Url,
    token_path: PathBuf,
}

impl HttpsTransport {
    pub fn new(config: &DiscoveryConfig) -> Result<Self, TransportError> {
        let master = Url::parse(&config.master)?;
        if master.cannot_be_a_base() {
            return Err(TransportError::MasterNotBase(config.master.clone()));
        }
        let mut builder = Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout.to_std_duration());
        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        } else if let Some(path) = &config.ca_cert {
            let pem = std::fs::read(path).map_err(|source| TransportError::CaCert {
                path: path.clone(),
                source,
            })?;
            builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            master,
            token_path: config.token_path.clone(),
        })
    }

    /// Appends the endpoints path to the master url, keeping any path prefix
    /// of a proxied api server.
    pub fn endpoints_url(&self, service: &ServiceRef) -> Result<Url, TransportError> {
        let mut url = self.master.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::MasterNotBase(self.master.to_string()))?
            .pop_if_empty()
            .extend([
                "api",
                "v1",
                "namespaces",
                service.namespace.as_str(),
                "endpoints",
                service.name.as_str(),
            ]);
        Ok(url)
    }

    async fn token(&self) -> Result<String, TransportError> {
        let token = tokio::fs::read_to_string(&self.token_path)
            .await
            .map_err(|source| TransportError::Token {
                path: self.token_path.clone(),
                source,
            })?;
        Ok(token.trim().to_string())
    }
}

#[async_trait]
impl EndpointsTransport for HttpsTransport {
    async fn fetch_endpoints(&self, service: &ServiceRef) -> Result<String, TransportError> {
        let url = self.endpoints_url(service)?;
        let token = self.token().await?;
        debug!(%url, "fetch endpoints");
        let response = self.client.get(url.clone()).bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text().await?)
    }
}

impl Debug for HttpsTransport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpsTransport")
            .field("master", &self.master.as_str())
            .field("token_path", &self.token_path)
            .finish_non_exhaustive()
    }
}
