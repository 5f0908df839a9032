use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::bus::{EventBus, ItemId, SiteEvent};
use crate::error::{Result, SiteError};

/// State shared by every node of the site navigation tree.
///
/// A node registers itself on the event bus as soon as it is built and stays
/// registered until [`SiteItemBase::dispose`] runs. Dropping a node that was
/// never disposed unregisters it (and, through the owned children, its whole
/// subtree) as well.
pub struct SiteItemBase {
    id: ItemId,
    /// `None` until the first assignment.
    name: Option<String>,
    selected: bool,
    is_renaming: bool,
    children: Vec<Box<dyn SiteItem>>,
    bus: Arc<dyn EventBus>,
    subscribed: bool,
    disposed: bool,
}

impl SiteItemBase {
    /// Create an unselected node with no children, already subscribed to `bus`.
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        let id = ItemId::new();
        bus.subscribe(id);
        debug!(item = %id, "site item subscribed");
        Self {
            id,
            name: None,
            selected: false,
            is_renaming: false,
            children: Vec::new(),
            bus,
            subscribed: true,
            disposed: false,
        }
    }

    /// Identity the node is registered under on the bus.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Current display name (empty until first assigned).
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Assign the display name.
    ///
    /// The first assignment always lands. After that the name only changes
    /// while the node is in rename mode; other assignments are ignored and
    /// `false` is returned.
    pub fn set_name(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.name.is_some() && !self.is_renaming {
            debug!(item = %self.id, ignored = %value, "name change outside rename mode");
            return false;
        }
        self.name = Some(value);
        true
    }

    /// Whether this node is the active selection.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Mark or unmark this node as the active selection.
    pub fn set_selected(&mut self, value: bool) {
        self.selected = value;
    }

    /// Whether the node is in rename mode.
    pub fn is_renaming(&self) -> bool {
        self.is_renaming
    }

    /// Enter or leave rename mode.
    ///
    /// Entering requires the node to be selected; leaving always succeeds.
    pub fn set_is_renaming(&mut self, value: bool) -> Result<()> {
        if value && !self.selected {
            warn!(item = %self.id, "rename requested on an unselected item");
            return Err(SiteError::InvalidOperation(format!(
                "item {} must be selected before it can be renamed",
                self.id
            )));
        }
        self.is_renaming = value;
        Ok(())
    }

    /// Owned children in display order.
    pub fn children(&self) -> &[Box<dyn SiteItem>] {
        &self.children
    }

    /// Mutable access to the children; edits do not notify the bus.
    pub fn children_mut(&mut self) -> &mut Vec<Box<dyn SiteItem>> {
        &mut self.children
    }

    /// Whether [`SiteItemBase::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Unsubscribe from the bus, then dispose every child in order.
    ///
    /// Calling this on an already disposed node does nothing. Disposal (like
    /// drop) recurses once per tree level, so depth is bounded by the stack.
    pub fn dispose(&mut self) {
        if self.disposed {
            debug!(item = %self.id, "site item already disposed");
            return;
        }
        self.unsubscribe();
        for child in &mut self.children {
            child.dispose();
        }
        self.disposed = true;
        debug!(item = %self.id, children = self.children.len(), "site item disposed");
    }

    fn unsubscribe(&mut self) {
        if self.subscribed {
            self.bus.unsubscribe(self.id);
            self.subscribed = false;
            debug!(item = %self.id, "site item unsubscribed");
        }
    }
}

impl Drop for SiteItemBase {
    fn drop(&mut self) {
        // Children are dropped after this and unsubscribe themselves.
        self.unsubscribe();
    }
}

impl fmt::Debug for SiteItemBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteItemBase")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("selected", &self.selected)
            .field("is_renaming", &self.is_renaming)
            .field("children", &self.children)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

/// A node of the site navigation tree.
///
/// Concrete variants (documents, folders, ...) embed a [`SiteItemBase`] and
/// decide what committing or undoing a rename means for them. Everything else
/// is provided on top of the base.
pub trait SiteItem: fmt::Debug {
    fn base(&self) -> &SiteItemBase;

    fn base_mut(&mut self) -> &mut SiteItemBase;

    /// Make the pending name permanent.
    fn commit_rename(&mut self) -> Result<()>;

    /// Discard the pending name.
    fn undo_rename(&mut self) -> Result<()>;

    /// React to an event delivered through the bus.
    fn handle(&mut self, _event: &SiteEvent) {}

    /// Release the node and its subtree.
    ///
    /// Overrides must call the base behavior before their own cleanup.
    fn dispose(&mut self) {
        self.base_mut().dispose();
    }

    fn id(&self) -> ItemId {
        self.base().id()
    }

    fn name(&self) -> &str {
        self.base().name()
    }

    fn set_name(&mut self, value: &str) -> bool {
        self.base_mut().set_name(value)
    }

    fn is_selected(&self) -> bool {
        self.base().is_selected()
    }

    fn set_selected(&mut self, value: bool) {
        self.base_mut().set_selected(value);
    }

    fn is_renaming(&self) -> bool {
        self.base().is_renaming()
    }

    fn set_is_renaming(&mut self, value: bool) -> Result<()> {
        self.base_mut().set_is_renaming(value)
    }

    fn children(&self) -> &[Box<dyn SiteItem>] {
        self.base().children()
    }

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SiteItem>> {
        self.base_mut().children_mut()
    }

    /// Append `child` after the existing children.
    fn add_child(&mut self, child: Box<dyn SiteItem>) {
        self.base_mut().children_mut().push(child);
    }

    fn is_disposed(&self) -> bool {
        self.base().is_disposed()
    }
}
