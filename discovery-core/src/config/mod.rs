use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Environment, File, FileFormat, Source};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::service::ServiceRef;
use crate::util::duration::ConfigDuration;
use crate::DISCOVERY_CONFIG;

pub const POD_NAMESPACE: &str = "POD_NAMESPACE";
pub const POD_NAME: &str = "POD_NAME";
pub const DEFAULT_NAMESPACE: &str = "default";
const ENV_PREFIX: &str = "DISCOVERY";

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub master: String,
    pub token_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
    pub accept_invalid_certs: bool,
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
    pub timeout: ConfigDuration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            master: "https://kubernetes.default.svc.cluster.local:443".to_string(),
            token_path: PathBuf::from("/var/run/secrets/kubernetes.io/serviceaccount/token"),
            ca_cert: Some(PathBuf::from("/var/run/secrets/kubernetes.io/serviceaccount/ca.crt")),
            accept_invalid_certs: false,
            service_name: String::new(),
            namespace: None,
            pod_name: None,
            timeout: ConfigDuration::from_secs(10),
        }
    }
}

impl DiscoveryConfig {
    pub fn builder() -> DiscoveryConfigBuilder {
        DiscoveryConfigBuilder::default()
    }

    /// Fills `namespace` and `pod_name` from `POD_NAMESPACE` and `POD_NAME`
    /// when they were not configured. The namespace ends up as `default` if
    /// neither is present.
    pub fn with_env_defaults<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|value| !value.is_empty());
        if is_unset(&self.namespace) {
            self.namespace = env(POD_NAMESPACE).or_else(|| {
                warn!("{} is not set, using namespace {}", POD_NAMESPACE, DEFAULT_NAMESPACE);
                Some(DEFAULT_NAMESPACE.to_string())
            });
        }
        if is_unset(&self.pod_name) {
            self.pod_name = env(POD_NAME);
        }
        self
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn pod_name(&self) -> Option<&str> {
        self.pod_name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn service(&self) -> ServiceRef {
        ServiceRef::new(self.service_name.clone(), self.namespace())
    }

    pub fn validate(self) -> Result<Self> {
        if self.service_name.trim().is_empty() {
            return Err(Error::InvalidConfig("service_name must be set".to_string()));
        }
        if self.master.trim().is_empty() {
            return Err(Error::InvalidConfig("master must be set".to_string()));
        }
        Ok(self)
    }
}

fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Layers the embedded defaults, any added sources and `DISCOVERY_*`
/// environment variables, later layers winning.
pub struct DiscoveryConfigBuilder {
    builder: config::ConfigBuilder<DefaultState>,
    lookup: fn(&str) -> Option<String>,
}

impl Default for DiscoveryConfigBuilder {
    fn default() -> Self {
        let builder = config::Config::builder().add_source(File::from_str(DISCOVERY_CONFIG, FileFormat::Toml));
        Self {
            builder,
            lookup: |key| std::env::var(key).ok(),
        }
    }
}

impl DiscoveryConfigBuilder {
    pub fn add_source<T>(self, source: T) -> Self
    where
        T: Source + Send + Sync + 'static,
    {
        Self {
            builder: self.builder.add_source(source),
            ..self
        }
    }

    pub fn set_override<S>(self, key: &str, value: S) -> Result<Self>
    where
        S: Into<config::Value>,
    {
        Ok(Self {
            builder: self.builder.set_override(key, value)?,
            ..self
        })
    }

    /// Replaces how `POD_NAMESPACE` and `POD_NAME` are looked up.
    pub fn env_lookup(self, lookup: fn(&str) -> Option<String>) -> Self {
        Self { lookup, ..self }
    }

    pub fn build(self) -> Result<DiscoveryConfig> {
        let config = self
            .builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize::<DiscoveryConfig>()?;
        config.with_env_defaults(self.lookup).validate()
    }
}

impl Debug for DiscoveryConfigBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryConfigBuilder").finish_non_exhaustive()
    }
}
