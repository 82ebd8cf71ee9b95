use std::sync::Arc;

use crate::config::DiscoveryConfig;
use crate::error::{Error, Result};
use crate::member::Member;
use crate::membership_cache::{ip_addresses_of, MembershipCache};
use crate::membership_snapshot::MembershipSnapshot;
use crate::service::ServiceRef;
use crate::settings::DiscoverySettings;
use crate::transport::{EndpointsTransport, HttpsTransport};

/// Finds the members of a service, optionally leaving out the current pod.
///
/// ```no_run
/// # async fn run() -> discovery_core::error::Result<()> {
/// use discovery_core::config::DiscoveryConfig;
/// use discovery_core::discovery::ServiceDiscovery;
///
/// let config = DiscoveryConfig::builder()
///     .set_override("service_name", "my-service")?
///     .build()?;
/// let discovery = ServiceDiscovery::from_config(&config)?;
/// let peers = discovery.find_other_ips().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ServiceDiscovery<T = HttpsTransport> {
    cache: MembershipCache<T>,
    pod_name: Option<String>,
}

impl ServiceDiscovery<HttpsTransport> {
    pub fn from_config(config: &DiscoveryConfig) -> Result<Self> {
        let transport = HttpsTransport::new(config).map_err(|source| Error::Transport {
            service: config.service().to_string(),
            source,
        })?;
        Ok(Self::new(transport, DiscoverySettings::from(config)))
    }
}

impl<T> ServiceDiscovery<T>
where
    T: EndpointsTransport,
{
    pub fn new(transport: T, settings: DiscoverySettings) -> Self {
        let service = settings.service();
        let pod_name = settings.pod_name.filter(|name| !name.is_empty());
        Self {
            cache: MembershipCache::new(transport, service),
            pod_name,
        }
    }

    pub fn service(&self) -> &ServiceRef {
        self.cache.service()
    }

    pub fn pod_name(&self) -> Option<&str> {
        self.pod_name.as_deref()
    }

    pub fn cache(&self) -> &MembershipCache<T> {
        &self.cache
    }

    pub async fn snapshot(&self) -> Result<Arc<MembershipSnapshot>> {
        self.cache.snapshot().await
    }

    pub async fn reload(&self) -> Result<Arc<MembershipSnapshot>> {
        self.cache.reload().await
    }

    /// All ready members, including the current pod.
    pub async fn find_all_members(&self) -> Result<Vec<Member>> {
        self.cache.all_members().await
    }

    /// Ready members other than the current pod.
    pub async fn find_other_members(&self) -> Result<Vec<Member>> {
        self.cache.other_members(self.pod_name()).await
    }

    pub async fn find_not_ready_members(&self) -> Result<Vec<Member>> {
        self.cache.not_ready_members().await
    }

    pub async fn find_all_ips(&self) -> Result<Vec<String>> {
        Ok(ip_addresses_of(&self.find_all_members().await?))
    }

    pub async fn find_other_ips(&self) -> Result<Vec<String>> {
        Ok(ip_addresses_of(&self.find_other_members().await?))
    }

    pub async fn find_member(&self, pod_name: &str) -> Result<Option<Member>> {
        self.cache.find_member(Some(pod_name)).await
    }

    pub async fn self_member(&self) -> Result<Option<Member>> {
        self.cache.self_member(self.pod_name()).await
    }
}
