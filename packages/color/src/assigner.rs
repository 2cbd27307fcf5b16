//! Memoized color lookup with a write-through persisted cache.
//!
//! [`ColorAssigner`] owns one in-memory cache guarded by a mutex. A miss
//! generates the color while holding the lock, so concurrent lookups of
//! the same name all observe a single generated value. Persistence runs
//! on one background task that owns the [`KeyValueStore`]: it hydrates
//! the cache from storage first and then applies whole-object writes in
//! the order they were requested.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use nabe_map_neighborhood_models::Color;
use tokio::sync::{mpsc, oneshot, watch};

use crate::palette::color_from_name;
use crate::store::KeyValueStore;

/// Storage key holding the JSON object `{name: {r, g, b}}`.
pub const COLOR_CACHE_KEY: &str = "neighborhood_colors";

/// Name to color, in the order names were first colored or restored.
type ColorCache = IndexMap<String, Color>;

enum Command {
    /// Write the current cache contents.
    Persist,
    /// Acknowledge once every earlier command has been handled.
    Flush(oneshot::Sender<()>),
}

struct Shared {
    cache: Mutex<ColorCache>,
    ready: watch::Sender<bool>,
}

impl Shared {
    fn new(ready: bool) -> Self {
        Self {
            cache: Mutex::new(ColorCache::new()),
            ready: watch::Sender::new(ready),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ColorCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Hands out stable colors for region names.
///
/// Cloning is cheap and every clone shares the same cache.
#[derive(Clone)]
pub struct ColorAssigner {
    shared: Arc<Shared>,
    persist: Option<mpsc::UnboundedSender<Command>>,
}

impl ColorAssigner {
    /// Creates an assigner backed by `store` and starts its persistence
    /// task.
    ///
    /// The assigner reports not-ready until the persisted cache has been
    /// read (or found missing or unreadable).
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let shared = Arc::new(Shared::new(false));
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(run_persistence(Arc::clone(&shared), store, rx));

        Self {
            shared,
            persist: Some(tx),
        }
    }

    /// Creates an assigner with no backing storage. It is ready
    /// immediately and never persists anything.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            shared: Arc::new(Shared::new(true)),
            persist: None,
        }
    }

    /// Whether hydration from storage has finished.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.shared.ready.borrow()
    }

    /// Waits until hydration from storage has finished.
    pub async fn wait_ready(&self) {
        let mut rx = self.shared.ready.subscribe();
        // The sender lives in `shared`, which we hold, so this cannot fail.
        rx.wait_for(|ready| *ready).await.ok();
    }

    /// Cached color for a name, without generating one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Color> {
        self.shared.lock().get(name).copied()
    }

    /// Color for a name, generating and caching it on first use.
    ///
    /// Never blocks on storage. A miss schedules a background write of
    /// the whole cache; a hit touches nothing but memory.
    #[must_use]
    pub fn color_for(&self, name: &str) -> Color {
        let mut cache = self.shared.lock();
        if let Some(color) = cache.get(name) {
            return *color;
        }

        let color = color_from_name(name);
        cache.insert(name.to_string(), color);
        drop(cache);

        if let Some(tx) = &self.persist
            && tx.send(Command::Persist).is_err()
        {
            log::warn!("Color persistence task has stopped; {name} will not be saved");
        }

        color
    }

    /// Number of cached colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    /// Whether no colors are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.lock().is_empty()
    }

    /// A copy of the current cache, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> IndexMap<String, Color> {
        self.shared.lock().clone()
    }

    /// Resolves once every write requested before this call has been
    /// attempted. Returns immediately for a detached assigner.
    pub async fn flush(&self) {
        let Some(tx) = &self.persist else {
            return;
        };
        let (done_tx, done_rx) = oneshot::channel();
        if tx.send(Command::Flush(done_tx)).is_ok() {
            done_rx.await.ok();
        }
    }
}

async fn run_persistence(
    shared: Arc<Shared>,
    store: Arc<dyn KeyValueStore>,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    hydrate(&shared, store.as_ref()).await;

    while let Some(command) = rx.recv().await {
        let mut pending_flushes = Vec::new();
        let mut dirty = false;

        match command {
            Command::Persist => dirty = true,
            Command::Flush(done) => pending_flushes.push(done),
        }

        // Coalesce whatever else is already queued into a single write.
        while let Ok(command) = rx.try_recv() {
            match command {
                Command::Persist => dirty = true,
                Command::Flush(done) => pending_flushes.push(done),
            }
        }

        if dirty {
            persist(&shared, store.as_ref()).await;
        }

        for done in pending_flushes {
            done.send(()).ok();
        }
    }

    log::debug!("Color persistence task shutting down");
}

async fn hydrate(shared: &Shared, store: &dyn KeyValueStore) {
    let persisted = match store.get(COLOR_CACHE_KEY).await {
        Ok(Some(raw)) => match serde_json::from_str::<ColorCache>(&raw) {
            Ok(persisted) => persisted,
            Err(e) => {
                log::warn!("Ignoring unreadable color cache: {e}");
                ColorCache::new()
            }
        },
        Ok(None) => {
            log::info!("No persisted color cache; starting empty");
            ColorCache::new()
        }
        Err(e) => {
            log::warn!("Failed to load color cache, starting empty: {e}");
            ColorCache::new()
        }
    };

    let restored = persisted.len();
    let needs_write = {
        let mut cache = shared.lock();
        let provisional = cache.keys().any(|name| !persisted.contains_key(name));
        cache.extend(persisted);
        provisional
    };

    log::info!("Restored {restored} neighborhood colors");
    shared.ready.send_replace(true);

    if needs_write {
        persist(shared, store).await;
    }
}

async fn persist(shared: &Shared, store: &dyn KeyValueStore) {
    let serialized = {
        let cache = shared.lock();
        serde_json::to_string(&*cache)
    };

    let result = match serialized {
        Ok(json) => store.set(COLOR_CACHE_KEY, json).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        log::warn!("Failed to persist color cache: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::StoreError;
    use crate::store::{JsonFileStore, MemoryStore};

    /// Counts writes and delegates to a [`MemoryStore`].
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        sets: AtomicUsize,
    }

    impl CountingStore {
        fn seeded(json: &str) -> Self {
            Self {
                inner: MemoryStore::with_entry(COLOR_CACHE_KEY, json),
                sets: AtomicUsize::new(0),
            }
        }

        fn sets(&self) -> usize {
            self.sets.load(Ordering::SeqCst)
        }

        async fn persisted(&self) -> ColorCache {
            let raw = self.inner.get(COLOR_CACHE_KEY).await.unwrap().unwrap();
            serde_json::from_str(&raw).unwrap()
        }
    }

    #[async_trait]
    impl KeyValueStore for CountingStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value).await
        }
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable {
                message: "disk on fire".to_string(),
            })
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::Unavailable {
                message: "disk on fire".to_string(),
            })
        }
    }

    #[test]
    fn detached_is_ready_and_memoizes() {
        let assigner = ColorAssigner::detached();
        assert!(assigner.is_ready());
        assert!(assigner.get("Manhattan").is_none());

        let first = assigner.color_for("Manhattan");
        assert_eq!(assigner.color_for("Manhattan"), first);
        assert_eq!(assigner.get("Manhattan"), Some(first));
        assert_eq!(first, color_from_name("Manhattan"));
        assert_ne!(assigner.color_for("Brooklyn"), first);
        assert_eq!(assigner.len(), 2);
    }

    #[test]
    fn concurrent_misses_generate_each_name_once() {
        // Every generated color queues exactly one persist command, so the
        // queue length counts generations.
        let (tx, mut rx) = mpsc::unbounded_channel();
        let assigner = ColorAssigner {
            shared: Arc::new(Shared::new(true)),
            persist: Some(tx),
        };

        let colors: Vec<(usize, Color)> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|n| {
                    let assigner = assigner.clone();
                    scope.spawn(move || {
                        let name = if n % 2 == 0 { "Greenpoint" } else { "Red Hook" };
                        (n % 2, assigner.color_for(name))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        drop(assigner);

        for (parity, color) in &colors {
            let name = if *parity == 0 { "Greenpoint" } else { "Red Hook" };
            assert_eq!(*color, color_from_name(name));
        }

        let mut generated = 0;
        while let Ok(command) = rx.try_recv() {
            assert!(matches!(command, Command::Persist));
            generated += 1;
        }
        assert_eq!(generated, 2);
    }

    #[test]
    fn snapshot_keeps_first_lookup_order() {
        let assigner = ColorAssigner::detached();
        for name in ["Tribeca", "Astoria", "Midtown", "Tribeca"] {
            let _ = assigner.color_for(name);
        }
        let names: Vec<String> = assigner.snapshot().into_keys().collect();
        assert_eq!(names, ["Tribeca", "Astoria", "Midtown"]);
    }

    #[tokio::test]
    async fn corrupt_cache_file_is_replaced_on_first_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.json");
        std::fs::write(&path, "{garbage").unwrap();

        let assigner = ColorAssigner::spawn(Arc::new(JsonFileStore::new(&path)));
        assigner.wait_ready().await;
        assert!(assigner.is_empty());

        let color = assigner.color_for("Harlem");
        assigner.flush().await;

        let reopened = JsonFileStore::new(&path);
        let raw = reopened.get(COLOR_CACHE_KEY).await.unwrap().unwrap();
        let persisted: ColorCache = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.get("Harlem"), Some(&color));
    }

    #[tokio::test]
    async fn persisted_color_wins_and_hits_do_not_write() {
        let store = Arc::new(CountingStore::seeded(
            r#"{"Manhattan": {"r": 1, "g": 2, "b": 3}}"#,
        ));
        let assigner = ColorAssigner::spawn(store.clone());
        assigner.wait_ready().await;

        assert_eq!(assigner.color_for("Manhattan"), Color::new(1, 2, 3));
        assert_eq!(assigner.color_for("Manhattan"), Color::new(1, 2, 3));
        assigner.flush().await;
        assert_eq!(store.sets(), 0);
    }

    #[tokio::test]
    async fn miss_is_written_through() {
        let store = Arc::new(CountingStore::default());
        let assigner = ColorAssigner::spawn(store.clone());
        assigner.wait_ready().await;

        let color = assigner.color_for("Brooklyn");
        assigner.flush().await;

        assert!(store.sets() >= 1);
        let persisted = store.persisted().await;
        assert_eq!(persisted.get("Brooklyn"), Some(&color));
    }

    #[tokio::test]
    async fn not_ready_until_hydrated_then_merged() {
        let store = Arc::new(CountingStore::seeded(
            r#"{"Queens": {"r": 9, "g": 9, "b": 9}, "Bronx": {"r": 4, "g": 5, "b": 6}}"#,
        ));
        let assigner = ColorAssigner::spawn(store.clone());

        // On the current-thread runtime the persistence task has not run yet.
        assert!(!assigner.is_ready());
        let provisional = assigner.color_for("Queens");
        assert_eq!(provisional, color_from_name("Queens"));
        let harlem = assigner.color_for("Harlem");

        assigner.wait_ready().await;
        assert!(assigner.is_ready());
        assert_eq!(assigner.color_for("Queens"), Color::new(9, 9, 9));
        assert_eq!(assigner.color_for("Bronx"), Color::new(4, 5, 6));

        assigner.flush().await;
        let persisted = store.persisted().await;
        assert_eq!(persisted.get("Queens"), Some(&Color::new(9, 9, 9)));
        assert_eq!(persisted.get("Bronx"), Some(&Color::new(4, 5, 6)));
        assert_eq!(persisted.get("Harlem"), Some(&harlem));
    }

    #[tokio::test]
    async fn unreadable_cache_starts_empty() {
        let store = Arc::new(CountingStore::seeded("[not an object"));
        let assigner = ColorAssigner::spawn(store.clone());
        assigner.wait_ready().await;
        assert!(assigner.is_empty());
        assert_eq!(assigner.color_for("Tribeca"), color_from_name("Tribeca"));
    }

    #[tokio::test]
    async fn storage_failures_never_reach_the_caller() {
        let assigner = ColorAssigner::spawn(Arc::new(FailingStore));
        assigner.wait_ready().await;

        let color = assigner.color_for("Astoria");
        assigner.flush().await;

        assert_eq!(color, color_from_name("Astoria"));
        assert_eq!(assigner.get("Astoria"), Some(color));
    }

    #[tokio::test]
    async fn flush_on_detached_returns_immediately() {
        let assigner = ColorAssigner::detached();
        let _ = assigner.color_for("Chelsea");
        assigner.flush().await;
        assigner.wait_ready().await;
    }
}
