//! Content view dispatch
//!
//! Menu items carry a [`ViewKey`]; the [`ViewRegistry`] resolves it to a fresh
//! view when the item is selected. New sections are added by registering
//! another factory, nothing else changes.
//!
//! The registry and selector are generic over the mounted view type so the
//! front end can store views that also know how to draw themselves; the shell
//! only relies on [`Viewable`].

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use super::menu::{MenuItem, ViewKey};
use crate::error::ServiceError;

/// A content section the shell can mount
pub trait Viewable: Send {
    /// Panel title
    fn title(&self) -> &str;

    /// Agent API path whose entries this view displays, if any
    fn source(&self) -> Option<&str> {
        None
    }

    /// Receive the entries loaded from [`Viewable::source`]
    fn load(&mut self, _entries: Result<Vec<Value>, ServiceError>) {}
}

type ViewFactory<V> = Box<dyn Fn() -> Box<V> + Send + Sync>;

/// Table of view factories keyed by menu view key
pub struct ViewRegistry<V: ?Sized = dyn Viewable> {
    factories: HashMap<ViewKey, ViewFactory<V>>,
}

impl<V: ?Sized + Viewable> ViewRegistry<V> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register (or replace) the factory for a key
    pub fn register<F>(&mut self, key: ViewKey, factory: F) -> &mut Self
    where
        F: Fn() -> Box<V> + Send + Sync + 'static,
    {
        self.factories.insert(key, Box::new(factory));
        self
    }

    pub fn contains(&self, key: &ViewKey) -> bool {
        self.factories.contains_key(key)
    }

    /// Build a new view instance for a key
    pub fn build(&self, key: &ViewKey) -> Option<Box<V>> {
        self.factories.get(key).map(|factory| factory())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<V: ?Sized + Viewable> Default for ViewRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ?Sized> fmt::Debug for ViewRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("keys", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The view currently mounted in the content panel
pub struct ActiveView<V: ?Sized = dyn Viewable> {
    key: ViewKey,
    view: Box<V>,
}

impl<V: ?Sized + Viewable> ActiveView<V> {
    pub fn key(&self) -> &ViewKey {
        &self.key
    }

    pub fn view(&self) -> &V {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> &mut V {
        self.view.as_mut()
    }
}

impl<V: ?Sized + Viewable> fmt::Debug for ActiveView<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveView")
            .field("key", &self.key)
            .field("title", &self.view.title())
            .finish()
    }
}

/// Holds the active content view and swaps it on menu selection
pub struct ViewSelector<V: ?Sized = dyn Viewable> {
    registry: ViewRegistry<V>,
    active: Option<ActiveView<V>>,
}

impl<V: ?Sized + Viewable> ViewSelector<V> {
    pub fn new(registry: ViewRegistry<V>) -> Self {
        Self {
            registry,
            active: None,
        }
    }

    /// Make `item`'s view the active one.
    ///
    /// Items without a view (or with a key nobody registered) clear the panel.
    /// Re-selecting the active key keeps the mounted instance. Returns `true`
    /// when a new view instance was mounted.
    pub fn select(&mut self, item: &MenuItem) -> bool {
        let Some(key) = item.view() else {
            debug!("Selected intrinsic item '{}'", item.selector);
            self.active = None;
            return false;
        };

        if self.active_key() == Some(key) {
            return false;
        }

        match self.registry.build(key) {
            Some(view) => {
                debug!("Mounting view '{}' for '{}'", key, item.selector);
                self.active = Some(ActiveView {
                    key: key.clone(),
                    view,
                });
                true
            }
            None => {
                warn!("No view registered for key '{}'", key);
                self.active = None;
                false
            }
        }
    }

    pub fn active(&self) -> Option<&ActiveView<V>> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveView<V>> {
        self.active.as_mut()
    }

    pub fn active_key(&self) -> Option<&ViewKey> {
        self.active.as_ref().map(|a| &a.key)
    }

    pub fn registry(&self) -> &ViewRegistry<V> {
        &self.registry
    }
}

impl<V: ?Sized + Viewable> fmt::Debug for ViewSelector<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewSelector")
            .field("registry", &self.registry)
            .field("active", &self.active)
            .finish()
    }
}
