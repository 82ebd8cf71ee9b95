use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("endpoints transport error for service {service}")]
    Transport {
        service: String,
        #[source]
        source: TransportError,
    },
    #[error("can't find end quote for field {field} starting at byte {position}")]
    MalformedPayload {
        field: String,
        position: usize,
    },
    #[error("discovery config error")]
    Config(#[from] config::ConfigError),
    #[error("invalid discovery config: {0}")]
    InvalidConfig(String),
}
