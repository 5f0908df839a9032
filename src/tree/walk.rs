//! Depth-first traversal over a site tree.
//!
//! Every helper walks in pre-order (a node before its children, children in
//! display order) and only goes through the [`SiteItem`] surface, so it works
//! for any mix of variants.

use crate::bus::{ItemId, SiteEvent};
use crate::tree::item::SiteItem;

/// Call `f` on `item` and every descendant.
pub fn visit(item: &dyn SiteItem, f: &mut dyn FnMut(&dyn SiteItem)) {
    f(item);
    for child in item.children() {
        visit(child.as_ref(), f);
    }
}

/// Mutable variant of [`visit`].
pub fn visit_mut(item: &mut dyn SiteItem, f: &mut dyn FnMut(&mut dyn SiteItem)) {
    f(&mut *item);
    for child in item.children_mut() {
        visit_mut(child.as_mut(), f);
    }
}

/// Node with the given id in the subtree, if any.
pub fn find(item: &dyn SiteItem, id: ItemId) -> Option<&dyn SiteItem> {
    if item.id() == id {
        return Some(item);
    }
    item.children()
        .iter()
        .find_map(|child| find(child.as_ref(), id))
}

/// Mutable variant of [`find`].
pub fn find_mut(item: &mut dyn SiteItem, id: ItemId) -> Option<&mut dyn SiteItem> {
    if item.id() == id {
        return Some(item);
    }
    item.children_mut()
        .iter_mut()
        .find_map(|child| find_mut(child.as_mut(), id))
}

/// First selected node, if any.
pub fn selected(item: &dyn SiteItem) -> Option<ItemId> {
    first_matching(item, &|node| node.is_selected())
}

/// First node in rename mode, if any.
pub fn renaming(item: &dyn SiteItem) -> Option<ItemId> {
    first_matching(item, &|node| node.is_renaming())
}

fn first_matching(item: &dyn SiteItem, pred: &dyn Fn(&dyn SiteItem) -> bool) -> Option<ItemId> {
    if pred(item) {
        return Some(item.id());
    }
    item.children()
        .iter()
        .find_map(|child| first_matching(child.as_ref(), pred))
}

/// Number of nodes in the subtree rooted at `item`, `item` included.
pub fn count(item: &dyn SiteItem) -> usize {
    let mut total = 0;
    visit(item, &mut |_| total += 1);
    total
}

/// Hand `event` to every node of the subtree that has not been disposed.
///
/// Returns how many nodes received it.
pub fn deliver(item: &mut dyn SiteItem, event: &SiteEvent) -> usize {
    let mut delivered = 0;
    visit_mut(item, &mut |node| {
        if !node.is_disposed() {
            node.handle(event);
            delivered += 1;
        }
    });
    delivered
}

/// Remove the descendant `id` from its parent and hand it back.
///
/// The detached subtree keeps its bus registration; the caller decides when
/// to dispose it. `root` itself can never be detached.
pub fn detach(root: &mut dyn SiteItem, id: ItemId) -> Option<Box<dyn SiteItem>> {
    let children = root.children_mut();
    if let Some(pos) = children.iter().position(|child| child.id() == id) {
        return Some(children.remove(pos));
    }
    children
        .iter_mut()
        .find_map(|child| detach(child.as_mut(), id))
}
