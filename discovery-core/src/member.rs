use std::fmt::{Display, Formatter};

use serde::Serialize;

/// One endpoint address of a service, as reported by the api server.
///
/// Readiness is decided by the address list the member was read from and never
/// changes afterwards.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Member {
    ip_address: String,
    node_name: String,
    pod_name: String,
    ready: bool,
}

impl Member {
    pub fn new(
        ip_address: impl Into<String>,
        node_name: impl Into<String>,
        pod_name: impl Into<String>,
        ready: bool,
    ) -> Self {
        Self {
            ip_address: ip_address.into(),
            node_name: node_name.into(),
            pod_name: pod_name.into(),
            ready,
        }
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    /// The node hosting the pod, `None` when the payload omitted it.
    pub fn node_name(&self) -> Option<&str> {
        if self.node_name.is_empty() {
            None
        } else {
            Some(&self.node_name)
        }
    }

    pub fn pod_name(&self) -> &str {
        &self.pod_name
    }

    /// `false` when the member came from the not ready address list.
    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

impl Display for Member {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ip:{} pod:{} node:{}", self.ip_address, self.pod_name, self.node_name)
    }
}
