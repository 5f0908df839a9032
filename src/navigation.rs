use std::sync::Arc;

use tracing::{debug, instrument};

use crate::bus::{EventBus, ItemId, SiteEvent};
use crate::config::SiteConfig;
use crate::error::{Result, SiteError};
use crate::tree::item::SiteItem;
use crate::tree::walk;

/// Rename in progress, as seen when it started.
#[derive(Debug, Clone)]
struct PendingRename {
    item: ItemId,
    original: String,
}

/// Drives selection and the rename workflow of a site tree.
///
/// Keeps at most one node selected and resolves a pending rename before the
/// selection moves elsewhere. Variants decide what committing or undoing means;
/// the navigator takes the node out of rename mode once they succeed.
pub struct Navigator {
    bus: Arc<dyn EventBus>,
    commit_on_deselect: bool,
    publish_renames: bool,
    publish_selection: bool,
    pending: Option<PendingRename>,
}

impl Navigator {
    /// Create a navigator publishing on `bus` with the rename and selection settings of `config`.
    pub fn new(bus: Arc<dyn EventBus>, config: &SiteConfig) -> Self {
        Self {
            bus,
            commit_on_deselect: config.commit_on_deselect(),
            publish_renames: config.publish_renames(),
            publish_selection: config.publish_selection_changes(),
            pending: None,
        }
    }

    /// Make `id` the only selected node of the tree.
    #[instrument(level = "debug", skip(self, root))]
    pub fn select(&mut self, root: &mut dyn SiteItem, id: ItemId) -> Result<()> {
        if walk::find(&*root, id).is_none() {
            return Err(SiteError::NotFound(id));
        }
        if walk::renaming(&*root).is_some_and(|renaming| renaming != id) {
            self.resolve_pending(root)?;
        }
        walk::visit_mut(root, &mut |item| {
            let target = item.id() == id;
            item.set_selected(target);
        });
        self.publish_selection_change(Some(id));
        Ok(())
    }

    /// Deselect everything, resolving a pending rename first.
    #[instrument(level = "debug", skip(self, root))]
    pub fn clear_selection(&mut self, root: &mut dyn SiteItem) -> Result<()> {
        if walk::renaming(&*root).is_some() {
            self.resolve_pending(root)?;
        }
        walk::visit_mut(root, &mut |item| item.set_selected(false));
        self.publish_selection_change(None);
        Ok(())
    }

    /// Put the selected node into rename mode and return its id.
    #[instrument(level = "debug", skip(self, root))]
    pub fn begin_rename(&mut self, root: &mut dyn SiteItem) -> Result<ItemId> {
        let id = walk::selected(&*root)
            .ok_or_else(|| SiteError::InvalidOperation("no item is selected".into()))?;
        if walk::renaming(&*root).is_some_and(|renaming| renaming != id) {
            self.resolve_pending(root)?;
        }
        let item = walk::find_mut(root, id).ok_or(SiteError::NotFound(id))?;
        if item.is_renaming() {
            return Ok(id);
        }
        item.set_is_renaming(true)?;
        self.pending = Some(PendingRename {
            item: id,
            original: item.name().to_string(),
        });
        debug!(item = %id, "rename started");
        Ok(id)
    }

    /// Forward an edited name to the node being renamed.
    ///
    /// Returns whether the node accepted the value.
    #[instrument(level = "debug", skip(self, root))]
    pub fn edit_name(&mut self, root: &mut dyn SiteItem, value: &str) -> Result<bool> {
        let item = renaming_item(root)?;
        Ok(item.set_name(value))
    }

    /// Commit the pending rename and leave rename mode.
    ///
    /// When the variant refuses the commit the node stays in rename mode and
    /// the error is returned.
    #[instrument(level = "debug", skip(self, root))]
    pub fn commit_rename(&mut self, root: &mut dyn SiteItem) -> Result<()> {
        let item = renaming_item(root)?;
        item.commit_rename()?;
        item.set_is_renaming(false)?;

        let id = item.id();
        let new_name = item.name().to_string();
        let pending = self.pending.take().filter(|pending| pending.item == id);
        if let Some(pending) = pending {
            if pending.original != new_name && self.publish_renames {
                self.bus.publish(SiteEvent::ItemRenamed {
                    item: id,
                    old_name: pending.original,
                    new_name,
                });
            }
        }
        debug!(item = %id, "rename committed");
        Ok(())
    }

    /// Undo the pending rename and leave rename mode.
    #[instrument(level = "debug", skip(self, root))]
    pub fn cancel_rename(&mut self, root: &mut dyn SiteItem) -> Result<()> {
        let item = renaming_item(root)?;
        item.undo_rename()?;
        item.set_is_renaming(false)?;
        debug!(item = %item.id(), "rename undone");
        self.pending = None;
        Ok(())
    }

    /// Detach `id` from the tree and dispose its subtree.
    #[instrument(level = "debug", skip(self, root))]
    pub fn remove(&mut self, root: &mut dyn SiteItem, id: ItemId) -> Result<()> {
        if root.id() == id {
            return Err(SiteError::InvalidOperation(
                "the root item cannot be removed".into(),
            ));
        }
        let mut removed = walk::detach(root, id).ok_or(SiteError::NotFound(id))?;

        let held_pending = self
            .pending
            .as_ref()
            .is_some_and(|pending| walk::find(removed.as_ref(), pending.item).is_some());
        if held_pending {
            self.pending = None;
        }
        let held_selection = walk::selected(removed.as_ref()).is_some();

        removed.dispose();
        self.bus.publish(SiteEvent::ItemRemoved { item: id });
        if held_selection {
            self.publish_selection_change(None);
        }
        Ok(())
    }

    fn resolve_pending(&mut self, root: &mut dyn SiteItem) -> Result<()> {
        if self.commit_on_deselect {
            self.commit_rename(root)
        } else {
            self.cancel_rename(root)
        }
    }

    fn publish_selection_change(&self, item: Option<ItemId>) {
        if self.publish_selection {
            self.bus.publish(SiteEvent::SelectionChanged { item });
        }
    }
}

fn renaming_item(root: &mut dyn SiteItem) -> Result<&mut dyn SiteItem> {
    let id = walk::renaming(&*root)
        .ok_or_else(|| SiteError::InvalidOperation("no rename in progress".into()))?;
    walk::find_mut(root, id).ok_or(SiteError::NotFound(id))
}
