pub mod codec;
pub mod file;
pub mod memory;
pub mod order;

use crate::app::Result;
use crate::domain::Item;

pub use file::{load, save};
pub use memory::MemoryStore;

/// Keyed item storage shared by concurrent reconciliation branches.
pub trait Store {
    fn get_item(&self, id: &str) -> Result<Option<Item>>;
    /// Inserts or overwrites by id, returning the previous entry.
    fn put_item(&self, item: Item) -> Result<Option<Item>>;
    fn item_count(&self) -> Result<usize>;
    fn all_items(&self) -> Result<Vec<Item>>;
}
