use crate::profile::dto::RawProfile;
use crate::storage::{keys, load_json, save_json, KeyValueStore, StoreError};

/// Profile cached from the server, if any.
pub async fn load_cached(store: &dyn KeyValueStore) -> Result<Option<RawProfile>, StoreError> {
    load_json(store, keys::PROFILE).await
}

pub async fn save_cached(store: &dyn KeyValueStore, profile: &RawProfile) -> Result<(), StoreError> {
    save_json(store, keys::PROFILE, profile).await
}

pub async fn load_draft(store: &dyn KeyValueStore) -> Result<Option<RawProfile>, StoreError> {
    load_json(store, keys::PROFILE_DRAFT).await
}

pub async fn save_draft(store: &dyn KeyValueStore, profile: &RawProfile) -> Result<(), StoreError> {
    save_json(store, keys::PROFILE_DRAFT, profile).await
}

pub async fn clear_draft(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(keys::PROFILE_DRAFT).await
}

/// The profile the UI should show: the cache wins over a draft.
pub async fn load_current(store: &dyn KeyValueStore) -> Result<Option<RawProfile>, StoreError> {
    match load_cached(store).await? {
        Some(profile) => Ok(Some(profile)),
        None => load_draft(store).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn profile(age: &str) -> RawProfile {
        RawProfile {
            age: age.into(),
            sex: "Female".into(),
            height: "160".into(),
            weight: "55".into(),
        }
    }

    #[tokio::test]
    async fn current_prefers_cache_over_draft() {
        let store = MemoryStore::new();
        assert_eq!(load_current(&store).await.unwrap(), None);

        save_draft(&store, &profile("30")).await.unwrap();
        assert_eq!(load_current(&store).await.unwrap(), Some(profile("30")));

        save_cached(&store, &profile("41")).await.unwrap();
        assert_eq!(load_current(&store).await.unwrap(), Some(profile("41")));

        clear_draft(&store).await.unwrap();
        assert_eq!(load_draft(&store).await.unwrap(), None);
    }
}
