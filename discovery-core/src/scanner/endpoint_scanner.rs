use tracing::{debug, trace};

use crate::error::Result;
use crate::member::Member;
use crate::membership_snapshot::MembershipSnapshot;
use crate::scanner::field_scanner::find_field_value;

const SUBSETS: &str = "\"subsets\":[";
const ADDRESSES: &str = "\"addresses\":[";
const NOT_READY_ADDRESSES: &str = "\"notReadyAddresses\":[";

const IP: &str = "ip";
const NODE_NAME: &str = "nodeName";
const NAME: &str = "name";

/// Scans an `Endpoints` response into ready and not ready members.
///
/// A payload without a `subsets` section yields an empty snapshot.
pub fn scan(payload: &str) -> Result<MembershipSnapshot> {
    let Some(subsets) = payload.find(SUBSETS) else {
        return Ok(MembershipSnapshot::default());
    };
    let region = &payload[subsets..];
    let ready = read_sections(region, ADDRESSES, true)?;
    let not_ready = read_sections(region, NOT_READY_ADDRESSES, false)?;
    Ok(MembershipSnapshot::new(ready, not_ready))
}

/// Reads every address list introduced by `marker`, each search starting from
/// the beginning of `region`.
fn read_sections(region: &str, marker: &str, ready: bool) -> Result<Vec<Member>> {
    let mut members = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = region[cursor..].find(marker) {
        let start = cursor + offset + marker.len();
        let end = section_end(region, start);
        read_addresses(&region[start..end], ready, &mut members)?;
        cursor = end;
    }
    Ok(members)
}

/// An address list ends where the next list of either kind begins.
fn section_end(region: &str, start: usize) -> usize {
    let rest = &region[start..];
    [ADDRESSES, NOT_READY_ADDRESSES]
        .iter()
        .filter_map(|marker| rest.find(marker))
        .min()
        .map_or(region.len(), |offset| start + offset)
}

fn read_addresses(section: &str, ready: bool, members: &mut Vec<Member>) -> Result<()> {
    let mut next_ip = find_field_value(section, 0, IP)?;
    while let Some(ip) = next_ip {
        next_ip = find_field_value(section, ip.next, IP)?;
        if ip.value.is_empty() {
            debug!(ready, "skipped endpoint address without ip");
            continue;
        }
        let entry_end = next_entry_start(section, ip.next);
        let entry = &section[..entry_end];
        let node_name = find_field_value(entry, ip.next, NODE_NAME)?.map_or("", |v| v.value);
        let pod_name = find_field_value(entry, ip.next, NAME)?.map_or("", |v| v.value);
        let member = Member::new(ip.value, node_name, pod_name, ready);
        trace!(%member, ready, "scanned endpoint address");
        members.push(member);
    }
    Ok(())
}

/// Start of the next `"ip":"` key after `from`, or the section end.
fn next_entry_start(section: &str, from: usize) -> usize {
    const IP_KEY: &str = "\"ip\":\"";
    section[from..].find(IP_KEY).map_or(section.len(), |offset| from + offset)
}
