//! Order in which items are written to the store file.
//!
//! Ids are compared by length, then ordinally, and the result is reversed:
//! longer ids come first, and equal-length ids run from high to low. The
//! order only makes the output reproducible; it carries no meaning.

use std::cmp::Ordering;

use crate::domain::Item;

pub fn persist_order(a: &Item, b: &Item) -> Ordering {
    let ascending = a
        .id
        .len()
        .cmp(&b.id.len())
        .then_with(|| a.id.as_bytes().cmp(b.id.as_bytes()));
    ascending.reverse()
}

pub fn sorted_for_persist(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by(persist_order);
    items
}
