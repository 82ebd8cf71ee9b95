use typed_builder::TypedBuilder;

use crate::config::{DiscoveryConfig, DEFAULT_NAMESPACE};
use crate::service::ServiceRef;

#[derive(Debug, Clone, Eq, PartialEq, TypedBuilder)]
pub struct DiscoverySettings {
    #[builder(setter(into))]
    pub service_name: String,
    #[builder(default = DEFAULT_NAMESPACE.to_string(), setter(into))]
    pub namespace: String,
    /// This pod, left out of [`crate::discovery::ServiceDiscovery::find_other_members`].
    #[builder(default, setter(strip_option, into))]
    pub pod_name: Option<String>,
}

impl DiscoverySettings {
    pub fn service(&self) -> ServiceRef {
        ServiceRef::new(self.service_name.clone(), self.namespace.clone())
    }
}

impl From<&DiscoveryConfig> for DiscoverySettings {
    fn from(value: &DiscoveryConfig) -> Self {
        Self {
            service_name: value.service_name.clone(),
            namespace: value.namespace().to_string(),
            pod_name: value.pod_name().map(str::to_string),
        }
    }
}
