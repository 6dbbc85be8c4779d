use cookiesync::cookies::mutation::{MutationQueue, MutationSpec};
use cookiesync::cookies::parser::{encode_pair, parse_cookies};
use cookiesync::crypto::fernet::Fernet;
use cookiesync::crypto::keyparams::KeyParams;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

fn unreserved_pairs() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[A-Za-z0-9_]{1,12}", "[A-Za-z0-9_.~-]{0,24}", 0..8)
}

proptest! {
    #[test]
    fn parse_recovers_rendered_pairs(pairs in unreserved_pairs()) {
        let raw = pairs
            .iter()
            .map(|(name, value)| encode_pair(name, value))
            .collect::<Vec<_>>()
            .join("; ");

        let parsed = parse_cookies(&raw).unwrap();
        let expected: HashMap<String, String> = pairs.into_iter().collect();
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn fernet_roundtrip(key in any::<[u8; 32]>(), plaintext in prop::collection::vec(any::<u8>(), 0..256)) {
        let fernet = Fernet::new(&key);
        let token = fernet.encrypt(&plaintext).unwrap();
        prop_assert_eq!(fernet.decrypt(&token).unwrap(), plaintext);
    }

    #[test]
    fn key_params_encode_parse(
        salt in prop::collection::vec(any::<u8>(), 1..32),
        iterations in 1u32..,
        magic in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let params = KeyParams { salt, iterations, magic };
        prop_assert_eq!(KeyParams::parse(&params.encode()).unwrap(), params);
    }

    #[test]
    fn clean_drops_only_applied(pairs in unreserved_pairs(), extra in "[a-z]{13,16}") {
        let snapshot: HashMap<String, String> = pairs.clone().into_iter().collect();
        let expiry = time::OffsetDateTime::now_utc() + time::Duration::days(1);

        let mut queue = MutationQueue::new();
        for (name, value) in &pairs {
            queue.insert(name.as_str(), MutationSpec::set(value.as_str(), expiry, "/"));
        }
        // Never present in the snapshot: names above are at most 12 chars.
        queue.insert(extra.as_str(), MutationSpec::set("v", expiry, "/"));

        let removed = queue.clean(&snapshot, "");
        prop_assert_eq!(removed, pairs.len());
        prop_assert_eq!(queue.len(), 1);
        prop_assert!(queue.contains(&extra));
    }
}
