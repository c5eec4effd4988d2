use std::collections::HashMap;

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const FIRST_NAMES: [&str; 10] = [
    "Alan", "Grace", "John", "Donald", "Edsger", "Linus", "James", "Guido", "Bjarne", "Ken",
];

pub const LAST_NAMES: [&str; 10] = [
    "Turing",
    "Hopper",
    "von Neumann",
    "Knuth",
    "Dijkstra",
    "Torvalds",
    "Gosling",
    "van Rossum",
    "Stroustrup",
    "Thompson",
];

pub const AVATARS: [&str; 10] = [
    "ade.jpg",
    "chris.jpg",
    "christian.jpg",
    "daniel.jpg",
    "elliot.jpg",
    "helen.jpg",
    "jenny.jpg",
    "joe.jpg",
    "justen.jpg",
    "laura.jpg",
];

const AVATAR_PREFIX: &str = "/avatar/small/";

/// Locally synthesized name and avatar shown in place of a raw public key.
///
/// Not an authentication claim: two keys may well draw the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayIdentity {
    pub display_name: String,
    pub avatar_ref: String,
}

impl DisplayIdentity {
    /// Draw a name and an avatar uniformly from the candidate lists
    pub fn mint<R: Rng>(rng: &mut R) -> Self {
        let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
        let avatar = AVATARS[rng.random_range(0..AVATARS.len())];

        Self {
            display_name: format!("{} {}", first, last),
            avatar_ref: format!("{}{}", AVATAR_PREFIX, avatar),
        }
    }
}

/// Session-local map from public key string to [`DisplayIdentity`].
///
/// Entries are minted on first sight and never change afterwards.
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: Mutex<HashMap<String, DisplayIdentity>>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the identity for `public_key`, minting and inserting one if absent
    pub fn resolve(&self, public_key: &str) -> DisplayIdentity {
        self.resolve_with(public_key, &mut rand::rng())
    }

    /// Same as [`IdentityCache::resolve`], drawing new identities from `rng`.
    ///
    /// Lookup and insert happen under one lock, so concurrent first sightings
    /// of a key still produce a single entry.
    pub fn resolve_with<R: Rng>(&self, public_key: &str, rng: &mut R) -> DisplayIdentity {
        let mut entries = self.entries.lock();
        if let Some(identity) = entries.get(public_key) {
            return identity.clone();
        }

        let identity = DisplayIdentity::mint(rng);
        tracing::debug!(
            display_name = %identity.display_name,
            "minted display identity for unseen key"
        );
        entries.insert(public_key.to_string(), identity.clone());
        identity
    }

    /// Look up an identity without minting
    pub fn get(&self, public_key: &str) -> Option<DisplayIdentity> {
        self.entries.lock().get(public_key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_mint_draws_from_candidates() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let identity = DisplayIdentity::mint(&mut rng);
            let (first, last) = identity.display_name.split_once(' ').unwrap();
            assert!(FIRST_NAMES.contains(&first));
            assert!(LAST_NAMES.contains(&last));
            let avatar = identity.avatar_ref.strip_prefix(AVATAR_PREFIX).unwrap();
            assert!(AVATARS.contains(&avatar));
        }
    }

    #[test]
    fn test_resolve_is_stable() {
        let cache = IdentityCache::new();
        let first = cache.resolve("PK1");
        for _ in 0..20 {
            assert_eq!(cache.resolve("PK1"), first);
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_resolve_twice_inserts_once() {
        let cache = IdentityCache::new();
        assert!(cache.get("PK1").is_none());

        let a = cache.resolve("PK1");
        let b = cache.resolve("PK1");
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("PK1"), Some(a));
    }

    #[test]
    fn test_distinct_keys_get_entries() {
        let cache = IdentityCache::new();
        cache.resolve("PK1");
        cache.resolve("PK2");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_concurrent_first_sight() {
        let cache = std::sync::Arc::new(IdentityCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.resolve("PK1"))
            })
            .collect();

        let identities: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(identities.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(cache.len(), 1);
    }
}
