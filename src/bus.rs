use std::fmt;

use uuid::Uuid;

/// Identity a site item registers under on the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Allocate a fresh, unique id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notifications exchanged between the navigation tree and the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteEvent {
    /// The active selection moved (`None` when nothing is selected).
    SelectionChanged { item: Option<ItemId> },
    /// A rename was committed and changed the item's name.
    ItemRenamed {
        item: ItemId,
        old_name: String,
        new_name: String,
    },
    /// An item and its subtree were removed from the tree and disposed.
    ItemRemoved { item: ItemId },
}

/// Publish/subscribe messaging backbone shared by every item of a tree.
///
/// Items only register and unregister themselves; how published events reach
/// subscribers is up to the implementation.
pub trait EventBus: Send + Sync {
    /// Register `subscriber` for delivery.
    fn subscribe(&self, subscriber: ItemId);
    /// Remove `subscriber`; no further events are delivered to it.
    fn unsubscribe(&self, subscriber: ItemId);
    /// Publish an event to the current subscribers.
    fn publish(&self, event: SiteEvent);
}
