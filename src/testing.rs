//! Test doubles shared by the unit tests.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::bus::{EventBus, ItemId, SiteEvent};
use crate::error::{Result, SiteError};
use crate::tree::item::{SiteItem, SiteItemBase};

/// A single call observed by [`RecordingBus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusCall {
    Subscribe(ItemId),
    Unsubscribe(ItemId),
    Publish(SiteEvent),
}

/// Event bus that records every call instead of dispatching.
#[derive(Debug, Default)]
pub struct RecordingBus {
    calls: Mutex<Vec<BusCall>>,
}

impl RecordingBus {
    pub fn calls(&self) -> Vec<BusCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn unsubscribed(&self) -> Vec<ItemId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BusCall::Unsubscribe(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn unsubscribe_count(&self, id: ItemId) -> usize {
        self.unsubscribed().into_iter().filter(|u| *u == id).count()
    }

    pub fn published(&self) -> Vec<SiteEvent> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BusCall::Publish(event) => Some(event),
                _ => None,
            })
            .collect()
    }
}

impl EventBus for RecordingBus {
    fn subscribe(&self, subscriber: ItemId) {
        self.calls.lock().unwrap().push(BusCall::Subscribe(subscriber));
    }

    fn unsubscribe(&self, subscriber: ItemId) {
        self.calls
            .lock()
            .unwrap()
            .push(BusCall::Unsubscribe(subscriber));
    }

    fn publish(&self, event: SiteEvent) {
        self.calls.lock().unwrap().push(BusCall::Publish(event));
    }
}

pub fn recording_bus() -> Arc<RecordingBus> {
    Arc::new(RecordingBus::default())
}

/// Observations a [`TestItem`] leaves behind, readable after the item has
/// been moved into a parent.
#[derive(Debug, Default)]
pub struct Tracker {
    disposals: AtomicUsize,
    commits: AtomicUsize,
    undos: AtomicUsize,
    base_first: AtomicBool,
    fail_commit: AtomicBool,
    handled: Mutex<Vec<SiteEvent>>,
}

impl Tracker {
    pub fn disposals(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn undos(&self) -> usize {
        self.undos.load(Ordering::SeqCst)
    }

    pub fn base_disposed_before_cleanup(&self) -> bool {
        self.base_first.load(Ordering::SeqCst)
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commit.store(fail, Ordering::SeqCst);
    }

    pub fn handled(&self) -> Vec<SiteEvent> {
        self.handled.lock().unwrap().clone()
    }
}

/// Minimal variant: remembers the name it had when rename mode started and
/// restores it on undo.
#[derive(Debug)]
pub struct TestItem {
    base: SiteItemBase,
    tracker: Arc<Tracker>,
    saved_name: Option<String>,
}

impl TestItem {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self {
            base: SiteItemBase::new(bus),
            tracker: Arc::new(Tracker::default()),
            saved_name: None,
        }
    }

    pub fn named(bus: Arc<dyn EventBus>, name: &str) -> Self {
        let mut item = Self::new(bus);
        item.set_name(name);
        item
    }

    pub fn tracker(&self) -> Arc<Tracker> {
        Arc::clone(&self.tracker)
    }
}

impl SiteItem for TestItem {
    fn base(&self) -> &SiteItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SiteItemBase {
        &mut self.base
    }

    fn commit_rename(&mut self) -> Result<()> {
        if self.tracker.fail_commit.load(Ordering::SeqCst) {
            return Err(SiteError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "commit refused",
            )));
        }
        self.saved_name = None;
        self.tracker.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn undo_rename(&mut self) -> Result<()> {
        if let Some(saved) = self.saved_name.take() {
            self.base.set_name(saved);
        }
        self.tracker.undos.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn handle(&mut self, event: &SiteEvent) {
        self.tracker.handled.lock().unwrap().push(event.clone());
    }

    fn dispose(&mut self) {
        self.base.dispose();
        self.tracker
            .base_first
            .store(self.base.is_disposed(), Ordering::SeqCst);
        self.tracker.disposals.fetch_add(1, Ordering::SeqCst);
    }

    fn set_is_renaming(&mut self, value: bool) -> Result<()> {
        let entering = value && !self.base.is_renaming();
        self.base.set_is_renaming(value)?;
        if entering {
            self.saved_name = Some(self.base.name().to_string());
        }
        Ok(())
    }
}
