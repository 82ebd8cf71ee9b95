use std::fmt::{Display, Formatter};

/// A service inside a namespace whose endpoints are discovered.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ServiceRef {
    pub name: String,
    pub namespace: String,
}

impl ServiceRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn endpoints_path(&self) -> String {
        format!("/api/v1/namespaces/{}/endpoints/{}", self.namespace, self.name)
    }
}

impl Display for ServiceRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
