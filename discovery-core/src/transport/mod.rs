use std::fmt::Debug;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::service::ServiceRef;

pub mod https_transport;
#[cfg(test)]
pub(crate) mod stub_transport;

pub use https_transport::HttpsTransport;

/// Fetches the raw `Endpoints` document of a service from the api server.
#[async_trait]
pub trait EndpointsTransport: Debug + Send + Sync {
    async fn fetch_endpoints(&self, service: &ServiceRef) -> Result<String, TransportError>;
}

#[async_trait]
impl<T> EndpointsTransport for std::sync::Arc<T>
where
    T: EndpointsTransport + ?Sized,
{
    async fn fetch_endpoints(&self, service: &ServiceRef) -> Result<String, TransportError> {
        (**self).fetch_endpoints(service).await
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to load service account token {path:?}")]
    Token {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load ca certificate {path:?}")]
    CaCert {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("endpoints request error")]
    Http(#[from] reqwest::Error),
    #[error("endpoints request {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("invalid master url")]
    Url(#[from] url::ParseError),
    #[error("master url {0} cannot carry a path")]
    MasterNotBase(String),
}
