//! Persistent, observable handle over the wishlist state.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use fakestore_core::{Product, ProductId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::state::{WishlistAction, WishlistState, reduce};
use crate::storage::{Storage, load_json, save_json};

/// Storage key holding the JSON array of wishlisted products.
pub const WISHLIST_STORAGE_KEY: &str = "wishlist";

/// Emitted after an effective wishlist mutation has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistEvent {
    Added(ProductId),
    Removed(ProductId),
}

impl WishlistEvent {
    /// Product the event is about.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        match self {
            Self::Added(id) | Self::Removed(id) => *id,
        }
    }
}

type Listener = Box<dyn Fn(&WishlistEvent) + Send + Sync>;

/// Handle to the wishlist.
///
/// Cheap to clone; all clones share state, storage and listeners.
///
/// Each effective mutation runs in this order: transition the state, write
/// the full item list to storage, notify listeners. Transition and write
/// happen under one lock, so storage always ends up holding the latest state.
/// Storage failures are logged and otherwise ignored.
#[derive(Clone)]
pub struct WishlistStore {
    inner: Arc<WishlistStoreInner>,
}

struct WishlistStoreInner {
    state: watch::Sender<WishlistState>,
    storage: Arc<dyn Storage>,
    /// Held across a transition and its storage write.
    write: Mutex<()>,
    listeners: RwLock<Vec<Listener>>,
}

impl WishlistStore {
    /// Open the wishlist, hydrating it from `storage`.
    ///
    /// A missing key gives an empty wishlist. So does an unreadable or
    /// malformed value, after logging a warning.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let initial = match load_json::<Vec<Product>>(storage.as_ref(), WISHLIST_STORAGE_KEY) {
            Ok(Some(products)) => {
                let state = reduce(&WishlistState::default(), WishlistAction::Load(products));
                info!(items = state.len(), "Loaded wishlist from storage");
                state
            }
            Ok(None) => WishlistState::default(),
            Err(e) => {
                warn!(error = %e, "Failed to load wishlist from storage, starting empty");
                WishlistState::default()
            }
        };

        let (tx, _rx) = watch::channel(initial);
        Self {
            inner: Arc::new(WishlistStoreInner {
                state: tx,
                storage,
                write: Mutex::new(()),
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Register a listener for [`WishlistEvent`]s.
    ///
    /// Listeners run synchronously on the mutating thread and must not
    /// register further listeners.
    pub fn on_change(&self, listener: impl Fn(&WishlistEvent) + Send + Sync + 'static) {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    /// Apply an action. Returns whether the state changed.
    ///
    /// `Load` replaces the contents and is persisted, but emits no event.
    pub fn dispatch(&self, action: WishlistAction) -> bool {
        let name = action.name();
        let event = match &action {
            WishlistAction::Add(product) => Some(WishlistEvent::Added(product.id)),
            WishlistAction::Remove(id) => Some(WishlistEvent::Removed(*id)),
            WishlistAction::Load(_) => None,
        };

        let changed = {
            let _write = self
                .inner
                .write
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            let mut saved = Vec::new();
            let changed = self.inner.state.send_if_modified(|state| {
                let next = reduce(state, action);
                if next == *state {
                    return false;
                }
                saved.clone_from(&next.items);
                *state = next;
                true
            });
            if changed {
                self.persist(&saved);
            }
            changed
        };
        debug!(action = name, changed, "Wishlist action");

        if changed && let Some(event) = event {
            self.emit(&event);
        }
        changed
    }

    /// Save `product`. No-op if it is already saved.
    pub fn add_to_wishlist(&self, product: Product) {
        self.dispatch(WishlistAction::Add(product));
    }

    /// Forget the product with `id`. No-op if it is not saved.
    pub fn remove_from_wishlist(&self, id: ProductId) {
        self.dispatch(WishlistAction::Remove(id));
    }

    /// Whether the product with `id` is saved.
    #[must_use]
    pub fn is_in_wishlist(&self, id: ProductId) -> bool {
        self.inner.state.borrow().contains(id)
    }

    /// The saved copy of the product with `id`.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.inner
            .state
            .borrow()
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }

    /// Remove `product` if saved, save it otherwise. Returns the new membership.
    pub fn toggle(&self, product: Product) -> bool {
        if self.is_in_wishlist(product.id) {
            self.remove_from_wishlist(product.id);
            false
        } else {
            self.add_to_wishlist(product);
            true
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> WishlistState {
        self.inner.state.borrow().clone()
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.borrow().len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().is_empty()
    }

    /// Receiver that is notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WishlistState> {
        self.inner.state.subscribe()
    }

    fn persist(&self, items: &[Product]) {
        if let Err(e) = save_json(self.inner.storage.as_ref(), WISHLIST_STORAGE_KEY, items) {
            warn!(error = %e, "Failed to persist wishlist");
        }
    }

    fn emit(&self, event: &WishlistEvent) {
        let listeners = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(event);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fakestore_core::{Price, Rating};
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(1999).unwrap(),
            description: "desc".to_string(),
            category: "jewelery".to_string(),
            image: format!("https://img.test/{id}.png"),
            rating: Rating::new(Decimal::new(45, 1), 7),
        }
    }

    /// Storage whose every operation fails.
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Read {
                key: key.to_string(),
                source: std::io::Error::other("disk on fire"),
            })
        }

        fn write(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_string(),
                source: std::io::Error::other("disk on fire"),
            })
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.write(key, "")
        }
    }

    #[test]
    fn test_add_persists_and_reloads() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let wishlist = WishlistStore::load(Arc::clone(&storage));
        assert!(wishlist.is_empty());

        let p = product(1);
        wishlist.add_to_wishlist(p.clone());

        let stored: Vec<Product> = load_json(storage.as_ref(), WISHLIST_STORAGE_KEY)
            .unwrap()
            .unwrap();
        assert_eq!(stored, vec![p.clone()]);

        let restarted = WishlistStore::load(storage);
        assert_eq!(restarted.snapshot().items, vec![p]);
    }

    #[test]
    fn test_malformed_storage_starts_empty() {
        let storage = Arc::new(MemoryStorage::with_entry(WISHLIST_STORAGE_KEY, "[{\"id\":"));
        let wishlist = WishlistStore::load(storage);
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_wrong_shape_starts_empty() {
        let storage = Arc::new(MemoryStorage::with_entry(
            WISHLIST_STORAGE_KEY,
            r#"{"items": "not an array"}"#,
        ));
        assert!(WishlistStore::load(storage).is_empty());
    }

    #[test]
    fn test_broken_storage_is_swallowed() {
        let wishlist = WishlistStore::load(Arc::new(BrokenStorage));
        assert!(wishlist.is_empty());

        wishlist.add_to_wishlist(product(1));
        assert!(wishlist.is_in_wishlist(ProductId::new(1)));
    }

    #[test]
    fn test_add_twice_is_idempotent() {
        let wishlist = WishlistStore::load(Arc::new(MemoryStorage::new()));
        wishlist.add_to_wishlist(product(1));
        let once = wishlist.snapshot();
        wishlist.add_to_wishlist(product(1));
        assert_eq!(wishlist.snapshot(), once);
    }

    #[test]
    fn test_remove_persists() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let wishlist = WishlistStore::load(Arc::clone(&storage));
        wishlist.add_to_wishlist(product(1));
        wishlist.add_to_wishlist(product(2));
        wishlist.remove_from_wishlist(ProductId::new(1));

        let stored: Vec<Product> = load_json(storage.as_ref(), WISHLIST_STORAGE_KEY)
            .unwrap()
            .unwrap();
        assert_eq!(stored, vec![product(2)]);
    }

    #[test]
    fn test_concurrent_writes_store_latest_state() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let wishlist = WishlistStore::load(Arc::clone(&storage));

        std::thread::scope(|scope| {
            for worker in 0..8_i64 {
                let wishlist = wishlist.clone();
                scope.spawn(move || {
                    for round in 0..50_i64 {
                        let id = worker * 100 + round % 5;
                        wishlist.toggle(product(id));
                    }
                });
            }
        });

        let stored: Vec<Product> = load_json(storage.as_ref(), WISHLIST_STORAGE_KEY)
            .unwrap()
            .unwrap();
        assert_eq!(stored, wishlist.snapshot().items);
    }

    #[test]
    fn test_toggle() {
        let wishlist = WishlistStore::load(Arc::new(MemoryStorage::new()));
        assert!(wishlist.toggle(product(5)));
        assert!(wishlist.is_in_wishlist(ProductId::new(5)));
        assert_eq!(wishlist.product(ProductId::new(5)), Some(product(5)));
        assert!(!wishlist.toggle(product(5)));
        assert!(!wishlist.is_in_wishlist(ProductId::new(5)));
        assert!(wishlist.product(ProductId::new(5)).is_none());
    }

    #[test]
    fn test_events_only_for_effective_mutations() {
        let wishlist = WishlistStore::load(Arc::new(MemoryStorage::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        wishlist.on_change(move |event| sink.lock().unwrap().push(*event));

        wishlist.add_to_wishlist(product(1));
        wishlist.add_to_wishlist(product(1));
        wishlist.remove_from_wishlist(ProductId::new(2));
        wishlist.remove_from_wishlist(ProductId::new(1));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                WishlistEvent::Added(ProductId::new(1)),
                WishlistEvent::Removed(ProductId::new(1)),
            ]
        );
    }

    #[test]
    fn test_event_fires_after_persist() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let wishlist = WishlistStore::load(Arc::clone(&storage));
        let persisted_at_event = Arc::new(Mutex::new(None));

        let observed_storage = Arc::clone(&storage);
        let observed = Arc::clone(&persisted_at_event);
        wishlist.on_change(move |_| {
            let stored: Option<Vec<Product>> =
                load_json(observed_storage.as_ref(), WISHLIST_STORAGE_KEY).unwrap();
            *observed.lock().unwrap() = stored.map(|items| items.len());
        });

        wishlist.add_to_wishlist(product(9));
        assert_eq!(*persisted_at_event.lock().unwrap(), Some(1));
    }
}
