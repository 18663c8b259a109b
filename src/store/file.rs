use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use crate::app::{MindsyncError, Result};
use crate::store::{codec, MemoryStore, Store};

/// Loads the mirror file, or an empty store if it does not exist yet.
pub fn load<P: AsRef<Path>>(path: P) -> Result<MemoryStore> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No store at {}, starting empty", path.display());
            return Ok(MemoryStore::new());
        }
        Err(e) => return Err(e.into()),
    };

    let items = codec::decode(BufReader::new(file))?;
    tracing::info!("Loaded {} items from {}", items.len(), path.display());
    Ok(MemoryStore::from_map(items))
}

/// Rewrites the mirror file. The new content goes to a sibling temp file
/// first and is renamed over the target once complete.
pub fn save<S: Store, P: AsRef<Path>>(store: &S, path: P) -> Result<usize> {
    let path = path.as_ref();
    let items = store.all_items()?;
    let count = items.len();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let written = File::create(&tmp)
        .map_err(MindsyncError::from)
        .and_then(|file| codec::encode(items, BufWriter::new(file)));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path)?;

    tracing::info!("Saved {} items to {}", count, path.display());
    Ok(count)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::domain::Item;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = load(dir.path().join("out.txt")).unwrap();
        assert_eq!(store.item_count().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");

        let mut remind = Item::with_message("42", "reshared\nbody");
        remind.remind_of = Some("7".into());
        let store = MemoryStore::from_items(vec![Item::with_message("1", "hi"), remind.clone()]);

        assert_eq!(save(&store, &path).unwrap(), 2);
        assert!(!temp_path(&path).exists());

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.item_count().unwrap(), 2);
        assert_eq!(loaded.get_item("42").unwrap(), Some(remind));
        assert_eq!(
            loaded.get_item("1").unwrap().and_then(|i| i.message),
            Some("hi".into())
        );
    }

    #[test]
    fn test_save_replaces_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "**MINDSYNC-old**\nstale\n").unwrap();

        save(&MemoryStore::from_items(vec![Item::with_message("new", "fresh")]), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "**MINDSYNC-new**\nfresh\n");
    }
}
