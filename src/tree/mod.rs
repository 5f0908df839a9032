pub mod item;
pub mod walk;
