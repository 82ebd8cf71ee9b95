use std::fmt::{Display, Formatter};

use ahash::{HashMap, HashMapExt};
use itertools::Itertools;

use crate::member::Member;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Slot {
    Ready(usize),
    NotReady(usize),
}

/// Ready and not ready members of a service from one fetch.
///
/// Both lists keep the order of the payload. Duplicate pod names are kept;
/// lookups resolve to the first ready member, then the first not ready one.
#[derive(Debug, Clone, Default)]
pub struct MembershipSnapshot {
    ready: Vec<Member>,
    not_ready: Vec<Member>,
    index: HashMap<String, Slot>,
}

impl MembershipSnapshot {
    pub fn new(ready: Vec<Member>, not_ready: Vec<Member>) -> Self {
        let mut index = HashMap::with_capacity(ready.len() + not_ready.len());
        for (i, member) in ready.iter().enumerate() {
            index.entry(member.pod_name().to_string()).or_insert(Slot::Ready(i));
        }
        for (i, member) in not_ready.iter().enumerate() {
            index.entry(member.pod_name().to_string()).or_insert(Slot::NotReady(i));
        }
        Self {
            ready,
            not_ready,
            index,
        }
    }

    pub fn ready(&self) -> &[Member] {
        &self.ready
    }

    pub fn not_ready(&self) -> &[Member] {
        &self.not_ready
    }

    /// An empty ready list means the service has not been loaded successfully
    /// yet, even when not ready members exist.
    pub fn has_ready_members(&self) -> bool {
        !self.ready.is_empty()
    }

    pub fn find(&self, pod_name: &str) -> Option<&Member> {
        self.index.get(pod_name).map(|slot| match *slot {
            Slot::Ready(i) => &self.ready[i],
            Slot::NotReady(i) => &self.not_ready[i],
        })
    }

    /// Ready members except the ones named `self_pod`.
    pub fn others<'a>(&'a self, self_pod: Option<&'a str>) -> impl Iterator<Item = &'a Member> + 'a {
        let self_pod = self_pod.filter(|name| !name.is_empty());
        self.ready.iter().filter(move |member| Some(member.pod_name()) != self_pod)
    }
}

impl PartialEq for MembershipSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.ready == other.ready && self.not_ready == other.not_ready
    }
}

impl Eq for MembershipSnapshot {}

impl Display for MembershipSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "members:[{}] notReady:[{}]",
            self.ready.iter().join(", "),
            self.not_ready.iter().join(", ")
        )
    }
}
