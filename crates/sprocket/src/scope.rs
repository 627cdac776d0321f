use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A lexically layered binding context. Lookup checks the local layer first,
/// then delegates to the parent chain. Used to hand shared resources (most
/// often a [`crate::Sprocket`]) to cooperating tasks without globals.
pub struct Scope<V> {
    parent: Option<Arc<Scope<V>>>,
    bindings: Mutex<HashMap<String, V>>,
}

impl<V: Clone> Scope<V> {
    /// Builds a new scope layered over `parent` with `bindings` as its local
    /// frame. Pure construction; an empty iterator yields an empty frame.
    pub fn derive(
        parent: Option<Arc<Scope<V>>>,
        bindings: impl IntoIterator<Item = (String, V)>,
    ) -> Arc<Self> {
        Arc::new(Self {
            parent,
            bindings: Mutex::new(bindings.into_iter().collect()),
        })
    }

    pub fn get(&self, name: &str) -> Option<V> {
        if let Ok(bindings) = self.bindings.lock() {
            if let Some(value) = bindings.get(name) {
                return Some(value.clone());
            }
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Overlays `value` in the local frame. Supported but orthogonal to the
    /// core contract; scopes are normally immutable after `derive`.
    pub fn set(&self, name: String, value: V) {
        if let Ok(mut bindings) = self.bindings.lock() {
            bindings.insert(name, value);
        }
    }
}
