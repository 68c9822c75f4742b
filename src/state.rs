use std::sync::Arc;

use crate::store::{InMemoryStore, PgStore, ProductStore, UserStore};

/// Store handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self {
            products: store.clone(),
            users: store,
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            products: store.clone(),
            users: store,
        }
    }
}
