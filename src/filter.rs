use crate::inventory::{InstanceRecord, InventorySnapshot};

/// Which instance address is used for listing and connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressKind {
    #[default]
    Public,
    Private,
}

impl AddressKind {
    fn of(self, record: &InstanceRecord) -> Option<&str> {
        match self {
            AddressKind::Public => record.public_ip.as_deref(),
            AddressKind::Private => record.private_ip.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredEntry {
    pub ordinal: usize,
    pub name: String,
    pub address: String,
}

/// Keeps named, addressable records whose name contains every keyword
/// (case-insensitive) and numbers them from 1 in snapshot order.
pub fn filter(
    snapshot: &InventorySnapshot,
    keywords: &[String],
    address_kind: AddressKind,
) -> Vec<FilteredEntry> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    snapshot
        .instances
        .iter()
        .filter_map(|record| {
            let address = address_kind.of(record)?;
            let name = record.name()?;
            matches_all(name, &keywords).then_some((name, address))
        })
        .enumerate()
        .map(|(i, (name, address))| FilteredEntry {
            ordinal: i + 1,
            name: name.to_string(),
            address: address.to_string(),
        })
        .collect()
}

fn matches_all(name: &str, lowercase_keywords: &[String]) -> bool {
    let name = name.to_lowercase();
    lowercase_keywords
        .iter()
        .all(|keyword| name.contains(keyword.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: Option<&str>, public_ip: Option<&str>) -> InstanceRecord {
        InstanceRecord {
            instance_id: format!("i-{}", name.unwrap_or("unnamed")),
            tags: name
                .map(|n| vec![("Name".to_string(), n.to_string())])
                .unwrap_or_default(),
            public_ip: public_ip.map(str::to_string),
            private_ip: Some("10.0.0.1".to_string()),
            state: None,
            instance_type: None,
        }
    }

    fn fleet() -> InventorySnapshot {
        InventorySnapshot {
            region: "us-west-2".to_string(),
            instances: vec![
                record(Some("web-1"), Some("1.2.3.4")),
                record(Some("db-1"), Some("5.6.7.8")),
                record(Some("web-2"), None),
            ],
        }
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn entry(ordinal: usize, name: &str, address: &str) -> FilteredEntry {
        FilteredEntry {
            ordinal,
            name: name.to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn test_single_keyword_skips_records_without_address() {
        let entries = filter(&fleet(), &words(&["web"]), AddressKind::Public);

        assert_eq!(entries, vec![entry(1, "web-1", "1.2.3.4")]);
    }

    #[test]
    fn test_keywords_are_case_insensitive_and_anded() {
        let entries = filter(&fleet(), &words(&["WEB", "1"]), AddressKind::Public);

        assert_eq!(entries, vec![entry(1, "web-1", "1.2.3.4")]);
    }

    #[test]
    fn test_no_keywords_lists_every_addressable_named_record() {
        let mut snapshot = fleet();
        snapshot.instances.push(record(None, Some("9.9.9.9")));
        snapshot.instances.push(record(Some("cache-1"), Some("4.4.4.4")));

        let entries = filter(&snapshot, &[], AddressKind::Public);

        assert_eq!(
            entries,
            vec![
                entry(1, "web-1", "1.2.3.4"),
                entry(2, "db-1", "5.6.7.8"),
                entry(3, "cache-1", "4.4.4.4"),
            ]
        );
    }

    #[test]
    fn test_ordinals_follow_output_position() {
        let snapshot = InventorySnapshot {
            region: "us-west-2".to_string(),
            instances: (0..10)
                .map(|i| {
                    let ip = (i % 3 != 0).then(|| format!("1.1.1.{}", i));
                    record(Some(&format!("node-{}", i)), ip.as_deref())
                })
                .collect(),
        };

        let entries = filter(&snapshot, &words(&["node"]), AddressKind::Public);

        assert_eq!(entries.len(), 6);
        for (i, e) in entries.iter().enumerate() {
            assert_eq!(e.ordinal, i + 1);
        }
    }

    #[test]
    fn test_keyword_order_does_not_matter() {
        let mut snapshot = fleet();
        snapshot
            .instances
            .push(record(Some("prod-web-api"), Some("2.2.2.2")));
        snapshot
            .instances
            .push(record(Some("staging-api"), Some("3.3.3.3")));

        let forward = filter(&snapshot, &words(&["api", "prod"]), AddressKind::Public);
        let backward = filter(&snapshot, &words(&["prod", "api"]), AddressKind::Public);

        assert_eq!(forward, backward);
        assert_eq!(forward, vec![entry(1, "prod-web-api", "2.2.2.2")]);
    }

    #[test]
    fn test_adding_keywords_never_grows_result() {
        let mut snapshot = fleet();
        snapshot
            .instances
            .push(record(Some("Web-Frontend-1"), Some("2.2.2.2")));
        let progression = [
            words(&[]),
            words(&["w"]),
            words(&["w", "e"]),
            words(&["w", "e", "front"]),
            words(&["w", "e", "front", "zzz"]),
        ];

        let sizes: Vec<usize> = progression
            .iter()
            .map(|k| filter(&snapshot, k, AddressKind::Public).len())
            .collect();

        assert_eq!(sizes, vec![3, 2, 2, 1, 0]);
    }

    #[test]
    fn test_private_addresses_when_requested() {
        let entries = filter(&fleet(), &words(&["web"]), AddressKind::Private);

        assert_eq!(
            entries,
            vec![
                entry(1, "web-1", "10.0.0.1"),
                entry(2, "web-2", "10.0.0.1"),
            ]
        );
    }
}
