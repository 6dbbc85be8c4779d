use cookiesync::base::cookieerror::{CookieError, Result};
use cookiesync::client::{ClientBoundary, DocumentJar, SyncRequest, SAVE_KEY, SYNC_KEY};
use cookiesync::cookies::config::StoreConfig;
use cookiesync::cookies::mapping::CookieMapping;
use cookiesync::cookies::mutation::MutationSpec;
use cookiesync::cookies::session::{SessionState, QUEUE_SLOT};
use cookiesync::cookies::store::CookieStore;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Client that replays scripted cookie strings and records every request.
#[derive(Default)]
struct ScriptedClient {
    replies: Mutex<VecDeque<Option<String>>>,
    requests: Mutex<Vec<SyncRequest>>,
}

impl ScriptedClient {
    fn reply(&self, raw: Option<&str>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(raw.map(str::to_string));
    }

    fn requests(&self) -> Vec<SyncRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ClientBoundary for ScriptedClient {
    async fn sync_cookies(&self, request: &SyncRequest) -> Result<Option<String>> {
        self.requests.lock().unwrap().push(request.clone());
        if request.save_only {
            return Ok(None);
        }
        Ok(self.replies.lock().unwrap().pop_front().flatten())
    }
}

#[tokio::test]
async fn test_end_to_end_cycle() {
    let client = ScriptedClient::default();
    let session = SessionState::new();

    // Cycle 1: the client has not reported yet.
    client.reply(None);
    let store = CookieStore::connect(&client, &session, StoreConfig::default())
        .await
        .unwrap();
    assert!(!store.ready());
    assert_eq!(store.get("a"), Err(CookieError::NotReady));

    // Cycle 2: empty jar.
    client.reply(Some(""));
    let store = CookieStore::connect(&client, &session, StoreConfig::default())
        .await
        .unwrap();
    assert!(store.ready());
    assert!(store.is_empty().unwrap());

    store.set("a", "1").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

    store.save().await.unwrap();
    let flush = client.requests().pop().unwrap();
    assert!(flush.save_only);
    assert_eq!(flush.key, SAVE_KEY);
    assert!(flush.queue.contains("a"));

    // Cycle 3: the client confirms the write.
    client.reply(Some("a=1"));
    let store = CookieStore::connect(&client, &session, StoreConfig::default())
        .await
        .unwrap();
    assert!(store.pending().is_empty());
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn test_queue_resent_until_confirmed() {
    let client = ScriptedClient::default();
    let session = SessionState::new();

    client.reply(Some(""));
    let store = CookieStore::connect(&client, &session, StoreConfig::default())
        .await
        .unwrap();
    store.set("a", "1").unwrap();
    drop(store);

    // The client is still stale: the entry survives and is resent.
    client.reply(Some(""));
    let store = CookieStore::connect(&client, &session, StoreConfig::default())
        .await
        .unwrap();
    assert!(store.pending().contains("a"));
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].key, SYNC_KEY);
    assert!(requests[1].queue.contains("a"));
}

#[tokio::test]
async fn test_delete_converges_once_absent() {
    let client = ScriptedClient::default();
    let session = SessionState::new();

    client.reply(Some("a=1; b=2"));
    let store = CookieStore::connect(&client, &session, StoreConfig::default())
        .await
        .unwrap();
    store.delete("a").unwrap();
    assert_eq!(store.names().unwrap(), vec!["b".to_string()]);

    client.reply(Some("b=2"));
    let store = CookieStore::connect(&client, &session, StoreConfig::default())
        .await
        .unwrap();
    assert!(store.pending().is_empty());
}

#[tokio::test]
async fn test_delete_absent_leaves_queue_unchanged() {
    let client = ScriptedClient::default();
    let session = SessionState::new();

    client.reply(Some("b=2"));
    let store = CookieStore::connect(&client, &session, StoreConfig::default())
        .await
        .unwrap();
    store.set("b", "3").unwrap();
    let before = store.pending();

    store.delete("a").unwrap();
    assert_eq!(store.pending(), before);
}

#[tokio::test]
async fn test_mutation_spec_carries_path_and_expiry() {
    let client = ScriptedClient::default();
    let session = SessionState::new();

    client.reply(Some(""));
    let config = StoreConfig::new().with_path("/app").with_expiry_days(30);
    let store = CookieStore::connect(&client, &session, config).await.unwrap();
    store.set("a", "1").unwrap();

    match store.pending().get("a").unwrap() {
        MutationSpec::Set {
            value,
            expires_at,
            path,
        } => {
            assert_eq!(value, "1");
            assert_eq!(path, "/app");
            let days = (*expires_at - time::OffsetDateTime::now_utc()).whole_days();
            assert!((29..=30).contains(&days));
        }
        other => panic!("Expected Set, got {:?}", other),
    }
}

#[tokio::test]
async fn test_prefixed_stores_share_one_jar() {
    let jar = DocumentJar::new();
    let session = SessionState::new();

    let left = CookieStore::connect(&jar, &session, StoreConfig::new().with_prefix("left."))
        .await
        .unwrap();
    let right = CookieStore::connect(&jar, &session, StoreConfig::new().with_prefix("right."))
        .await
        .unwrap();

    left.set("a", "L").unwrap();
    right.set("a", "R").unwrap();
    left.save().await.unwrap();
    right.save().await.unwrap();

    assert_eq!(jar.get("left.a").as_deref(), Some("L"));
    assert_eq!(jar.get("right.a").as_deref(), Some("R"));
    assert_eq!(session.pending(QUEUE_SLOT), 0);

    let left = CookieStore::connect(&jar, &session, StoreConfig::new().with_prefix("left."))
        .await
        .unwrap();
    assert_eq!(left.to_map().unwrap().len(), 1);
    assert_eq!(left.get("a").unwrap().as_deref(), Some("L"));
}

#[tokio::test]
async fn test_percent_encoded_values_reach_store_decoded() {
    let client = ScriptedClient::default();
    let session = SessionState::new();

    client.reply(Some("greeting=hello%20world; na%3Dme=v"));
    let store = CookieStore::connect(&client, &session, StoreConfig::default())
        .await
        .unwrap();

    assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello world"));
    assert_eq!(store.get("na=me").unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn test_mapping_trait_object_usage() {
    async fn write_through<M: CookieMapping>(cookies: &M) -> Result<()> {
        cookies.set("k", "v")?;
        cookies.save().await
    }

    let jar = DocumentJar::new();
    let session = SessionState::new();
    let store = CookieStore::connect(&jar, &session, StoreConfig::default())
        .await
        .unwrap();

    write_through(&store).await.unwrap();
    assert_eq!(jar.get("k").as_deref(), Some("v"));
    assert!(store.contains("k").unwrap());
}
