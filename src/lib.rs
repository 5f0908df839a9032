//! Nodes of a site navigation tree.
//!
//! Every node ([`SiteItem`]) owns its children, can be renamed in place once it
//! is the selected node, and stays registered on a shared [`EventBus`] from
//! construction until it is disposed. [`Navigator`] drives selection and the
//! rename workflow over a whole tree.

pub mod bus;
pub mod config;
pub mod error;
pub mod navigation;
pub mod tree;

#[cfg(test)]
pub(crate) mod testing;

pub use bus::{EventBus, ItemId, SiteEvent};
pub use config::SiteConfig;
pub use error::{Result, SiteError};
pub use navigation::Navigator;
pub use tree::item::{SiteItem, SiteItemBase};
