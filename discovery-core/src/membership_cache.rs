use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::member::Member;
use crate::membership_snapshot::MembershipSnapshot;
use crate::scanner;
use crate::service::ServiceRef;
use crate::transport::EndpointsTransport;

/// Holds the latest membership snapshot of one service.
///
/// The snapshot is fetched on first use and fetched again on access for as
/// long as it has no ready members. Loads are serialized: callers arriving
/// while a fetch is in flight wait for it and share its result.
#[derive(Debug)]
pub struct MembershipCache<T> {
    transport: T,
    service: ServiceRef,
    current: ArcSwapOption<MembershipSnapshot>,
    loads: AtomicU64,
    load_lock: tokio::sync::Mutex<()>,
}

impl<T> MembershipCache<T>
where
    T: EndpointsTransport,
{
    pub fn new(transport: T, service: ServiceRef) -> Self {
        Self {
            transport,
            service,
            current: ArcSwapOption::empty(),
            loads: AtomicU64::new(0),
            load_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn service(&self) -> &ServiceRef {
        &self.service
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The cached snapshot, if one has been stored and has ready members.
    pub fn cached(&self) -> Option<Arc<MembershipSnapshot>> {
        self.current.load_full().filter(|snapshot| snapshot.has_ready_members())
    }

    pub async fn snapshot(&self) -> Result<Arc<MembershipSnapshot>> {
        let observed = self.loads.load(Ordering::Acquire);
        if let Some(snapshot) = self.cached() {
            return Ok(snapshot);
        }
        let _guard = self.load_lock.lock().await;
        if self.loads.load(Ordering::Acquire) != observed {
            if let Some(snapshot) = self.current.load_full() {
                return Ok(snapshot);
            }
        }
        self.load().await
    }

    /// Drops the cached snapshot and fetches a new one.
    pub async fn reload(&self) -> Result<Arc<MembershipSnapshot>> {
        let _guard = self.load_lock.lock().await;
        self.current.store(None);
        self.load().await
    }

    pub async fn all_members(&self) -> Result<Vec<Member>> {
        Ok(self.snapshot().await?.ready().to_vec())
    }

    /// Ready members without `self_pod`; all ready members when it is unset.
    pub async fn other_members(&self, self_pod: Option<&str>) -> Result<Vec<Member>> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.others(self_pod).cloned().collect())
    }

    pub async fn not_ready_members(&self) -> Result<Vec<Member>> {
        Ok(self.snapshot().await?.not_ready().to_vec())
    }

    /// Looks the pod up among the ready members first, then the not ready ones.
    pub async fn find_member(&self, pod_name: Option<&str>) -> Result<Option<Member>> {
        let Some(pod_name) = pod_name.filter(|name| !name.is_empty()) else {
            return Ok(None);
        };
        Ok(self.snapshot().await?.find(pod_name).cloned())
    }

    pub async fn self_member(&self, self_pod: Option<&str>) -> Result<Option<Member>> {
        self.find_member(self_pod).await
    }

    /// Must be called with `load_lock` held.
    async fn load(&self) -> Result<Arc<MembershipSnapshot>> {
        debug!(service = %self.service, "load service members");
        let payload = self
            .transport
            .fetch_endpoints(&self.service)
            .await
            .map_err(|source| Error::Transport {
                service: self.service.to_string(),
                source,
            })?;
        let snapshot = Arc::new(scanner::scan(&payload)?);
        if snapshot.has_ready_members() {
            info!(
                service = %self.service,
                ready = snapshot.ready().len(),
                not_ready = snapshot.not_ready().len(),
                "service members loaded"
            );
        } else {
            warn!(
                service = %self.service,
                not_ready = snapshot.not_ready().len(),
                "service has no ready members"
            );
        }
        self.current.store(Some(snapshot.clone()));
        self.loads.fetch_add(1, Ordering::AcqRel);
        Ok(snapshot)
    }
}

/// The ip address of every member, in order.
pub fn ip_addresses_of(members: &[Member]) -> Vec<String> {
    members.iter().map(|member| member.ip_address().to_string()).collect()
}
