use gdk_pixbuf::Pixbuf;
use freedesktop_icons::lookup;
use parking_lot::RwLock;
use sectorwheel::IconRef;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const ICON_SIZE: i32 = 128;

static PATHS: OnceLock<RwLock<HashMap<IconRef, Option<PathBuf>>>> = OnceLock::new();

/// Absolute path or freedesktop icon name. Lookups are remembered for the
/// life of the process, misses included.
pub fn find_icon_path(icon: &IconRef) -> Option<PathBuf> {
    if icon.is_empty() {
        return None;
    }

    let cache = PATHS.get_or_init(|| RwLock::new(HashMap::new()));
    if let Some(found) = cache.read().get(icon) {
        return found.clone();
    }

    let found = lookup_icon_path(icon);
    cache.write().insert(icon.clone(), found.clone());
    found
}

fn lookup_icon_path(icon: &IconRef) -> Option<PathBuf> {
    let path = Path::new(icon.as_str());
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    lookup(icon.as_str())
        .with_size(ICON_SIZE as u16)
        .with_scale(1)
        .find()
}

/// Decoded icon images, owned by the window that draws them.
#[derive(Default)]
pub struct IconCache {
    images: RefCell<HashMap<IconRef, Option<Pixbuf>>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, icon: &IconRef) -> Option<Pixbuf> {
        if let Some(image) = self.images.borrow().get(icon) {
            return image.clone();
        }

        let image = find_icon_path(icon).and_then(|path| {
            Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true)
                .map_err(|e| log::error!("Failed to load icon {}: {}", path.display(), e))
                .ok()
        });
        self.images.borrow_mut().insert(icon.clone(), image.clone());
        image
    }

    pub fn clear(&self) {
        self.images.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_has_no_path() {
        assert_eq!(find_icon_path(&IconRef::from("")), None);
    }

    #[test]
    fn test_absolute_paths() {
        let path = std::env::temp_dir().join(format!("wheelview-icon-{}.png", std::process::id()));
        fs_err::write(&path, b"not really a png").unwrap();

        let icon = IconRef::new(path.to_string_lossy().into_owned());
        assert_eq!(find_icon_path(&icon), Some(path.clone()));

        // unreadable image data is a miss, not a panic
        assert!(IconCache::new().get(&icon).is_none());

        fs_err::remove_file(&path).unwrap();
        assert_eq!(
            find_icon_path(&IconRef::from("/nonexistent/wheelview/icon.png")),
            None
        );
    }
}
