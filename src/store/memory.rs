use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::app::{MindsyncError, Result};
use crate::domain::Item;
use crate::store::Store;

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, Item>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(items: HashMap<String, Item>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    pub fn from_items<I: IntoIterator<Item = Item>>(items: I) -> Self {
        Self::from_map(items.into_iter().map(|i| (i.id.clone(), i)).collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Item>>> {
        self.items
            .lock()
            .map_err(|e| MindsyncError::Store(e.to_string()))
    }
}

impl Store for MemoryStore {
    fn get_item(&self, id: &str) -> Result<Option<Item>> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn put_item(&self, item: Item) -> Result<Option<Item>> {
        Ok(self.lock()?.insert(item.id.clone(), item))
    }

    fn item_count(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    fn all_items(&self) -> Result<Vec<Item>> {
        Ok(self.lock()?.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_put_overwrites_same_id() {
        let store = MemoryStore::new();
        assert!(store.put_item(Item::with_message("1", "a")).unwrap().is_none());

        let previous = store.put_item(Item::with_message("1", "b")).unwrap();
        assert_eq!(previous.and_then(|i| i.message), Some("a".into()));
        assert_eq!(store.item_count().unwrap(), 1);
        assert_eq!(
            store.get_item("1").unwrap().and_then(|i| i.message),
            Some("b".into())
        );
    }

    #[test]
    fn test_get_missing_item() {
        let store = MemoryStore::from_items(vec![Item::new("1")]);
        assert!(store.get_item("2").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_on_distinct_keys() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();

        for i in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .put_item(Item::with_message(i.to_string(), "x"))
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.item_count().unwrap(), 64);
    }
}
