use std::collections::BTreeMap;

/// Key of the top-level folder every other folder hangs off.
pub const DESKTOP_GRID_ID: &str = "desktop";

/// Grid identifiers ending in this suffix name folders.
pub const FOLDER_SUFFIX: &str = ".directory";

/// Folder identifier mapped to its ordered contents.
///
/// The order of each sequence is the on-screen order. Every folder that
/// appears as a member also has its own key, possibly with no contents.
pub type IconTree = BTreeMap<String, Vec<String>>;

/// Returns `true` if `id` names a folder.
pub fn is_folder(id: &str) -> bool {
    id.ends_with(FOLDER_SUFFIX)
}

/// Position of an identifier inside the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPosition {
    pub folder: String,
    /// The identifier that followed it, `None` when it was the last one.
    pub next_sibling: Option<String>,
}

/// Finds the folder containing `id` and the identifier right after it.
pub fn locate(tree: &IconTree, id: &str) -> Option<IconPosition> {
    tree.iter().find_map(|(folder, icons)| {
        icons.iter().position(|icon| icon == id).map(|index| IconPosition {
            folder: folder.clone(),
            next_sibling: icons.get(index + 1).cloned(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_folder() {
        assert!(is_folder("eos-folder-games.directory"));
        assert!(!is_folder("org.gnome.Maps.desktop"));
        assert!(!is_folder(""));
    }

    #[test]
    fn test_locate_reports_next_sibling() {
        let mut tree = IconTree::new();
        tree.insert(DESKTOP_GRID_ID.to_string(), vec!["a.desktop".into(), "b.desktop".into()]);
        assert_eq!(
            locate(&tree, "a.desktop"),
            Some(IconPosition { folder: "desktop".into(), next_sibling: Some("b.desktop".into()) })
        );
        assert_eq!(
            locate(&tree, "b.desktop"),
            Some(IconPosition { folder: "desktop".into(), next_sibling: None })
        );
        assert_eq!(locate(&tree, "c.desktop"), None);
    }
}
