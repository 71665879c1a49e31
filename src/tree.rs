//! Derived directory tree over a flat [`FileMap`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::path;
use crate::types::FileMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn root() -> Self {
        Self::folder(String::new(), "/".to_string())
    }

    fn folder(name: String, path: String) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::Folder,
            children: BTreeMap::new(),
        }
    }

    fn file(name: String, path: String) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::File,
            children: BTreeMap::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Look up a descendant (or self) by path.
    pub fn find(&self, target: &str) -> Option<&TreeNode> {
        let mut current = self;
        for segment in path::segments(target) {
            current = current.children.get(&segment)?;
        }
        Some(current)
    }

    /// Number of file leaves under this node.
    pub fn file_count(&self) -> usize {
        match self.kind {
            NodeKind::File => 1,
            NodeKind::Folder => self.children.values().map(TreeNode::file_count).sum(),
        }
    }

    /// Children in display order: folders first, then by name.
    pub fn sorted_children(&self) -> Vec<&TreeNode> {
        let mut children: Vec<&TreeNode> = self.children.values().collect();
        children.sort_by(|a, b| {
            b.is_folder()
                .cmp(&a.is_folder())
                .then_with(|| a.name.cmp(&b.name))
        });
        children
    }
}

/// Places where the flat map does not fold cleanly into one tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathConflict {
    /// Distinct raw keys that land on the same tree position.
    Alias { path: String, keys: Vec<String> },
    /// A file key that is also the prefix of other keys; shown as a folder.
    FileShadowed { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub root: TreeNode,
    pub conflicts: Vec<PathConflict>,
}

/// Build the nested tree for a file map. Never fails; irregular keys are
/// normalized and any resulting collisions are reported as conflicts.
pub fn build_tree(files: &FileMap) -> Tree {
    let mut root = TreeNode::root();
    let mut by_path: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for key in files.keys() {
        let segments = path::segments(key);
        by_path
            .entry(format!("/{}", segments.join("/")))
            .or_default()
            .push(key.clone());

        let last = segments.len().saturating_sub(1);
        let mut current = &mut root;
        let mut node_path = String::new();

        for (i, segment) in segments.into_iter().enumerate() {
            node_path.push('/');
            node_path.push_str(&segment);

            let is_leaf = i == last;
            let child = current
                .children
                .entry(segment.clone())
                .or_insert_with(|| {
                    if is_leaf {
                        TreeNode::file(segment, node_path.clone())
                    } else {
                        TreeNode::folder(segment, node_path.clone())
                    }
                });
            if !is_leaf {
                // An intermediate segment is always a folder
                child.kind = NodeKind::Folder;
            }
            current = child;
        }
    }

    let mut conflicts = Vec::new();
    let mut shadowed = BTreeSet::new();
    for (normalized, keys) in &by_path {
        if keys.len() > 1 {
            conflicts.push(PathConflict::Alias {
                path: normalized.clone(),
                keys: keys.clone(),
            });
        }
        if normalized != "/" && root.find(normalized).is_some_and(TreeNode::is_folder) {
            shadowed.insert(normalized.clone());
        }
    }
    conflicts.extend(
        shadowed
            .into_iter()
            .map(|path| PathConflict::FileShadowed { path }),
    );

    for conflict in &conflicts {
        tracing::warn!(?conflict, "file map does not fold cleanly into a tree");
    }

    Tree { root, conflicts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileRecord;

    fn map(keys: &[&str]) -> FileMap {
        keys.iter()
            .map(|k| (k.to_string(), FileRecord::new("")))
            .collect()
    }

    #[test]
    fn test_build_nested() {
        let tree = build_tree(&map(&["/a/b.js", "/a/c/d.js"]));
        assert!(tree.conflicts.is_empty());

        let root = &tree.root;
        assert_eq!(root.path, "/");
        assert!(root.is_folder());
        assert_eq!(root.children.len(), 1);

        let a = &root.children["a"];
        assert!(a.is_folder());
        assert_eq!(a.path, "/a");
        assert!(a.children["b.js"].is_file());

        let c = &a.children["c"];
        assert!(c.is_folder());
        assert_eq!(c.children["d.js"].path, "/a/c/d.js");
        assert!(c.children["d.js"].is_file());
        assert_eq!(root.file_count(), 2);
    }

    #[test]
    fn test_empty_map_is_bare_root() {
        let tree = build_tree(&FileMap::new());
        assert!(tree.root.children.is_empty());
        assert_eq!(tree.root.path, "/");
    }

    #[test]
    fn test_keys_are_normalized() {
        let tree = build_tree(&map(&["src/main.rs/", "//lib//x.rs"]));
        assert_eq!(tree.root.find("/src/main.rs").unwrap().path, "/src/main.rs");
        assert!(tree.root.find("/lib/x.rs").unwrap().is_file());
        assert!(tree.conflicts.is_empty());
    }

    #[test]
    fn test_alias_conflict_reported() {
        let tree = build_tree(&map(&["/a.js", "a.js", "/a.js/", "//a.js"]));
        assert_eq!(tree.root.children.len(), 1);
        assert_eq!(
            tree.conflicts,
            vec![PathConflict::Alias {
                path: "/a.js".into(),
                keys: vec![
                    "//a.js".into(),
                    "/a.js".into(),
                    "/a.js/".into(),
                    "a.js".into()
                ],
            }]
        );
    }

    #[test]
    fn test_shadowed_file_becomes_folder() {
        // Order of insertion must not matter
        for keys in [["/a", "/a/b.js"], ["/a/b.js", "/a"]] {
            let tree = build_tree(&map(&keys));
            assert!(tree.root.children["a"].is_folder());
            assert_eq!(
                tree.conflicts,
                vec![PathConflict::FileShadowed { path: "/a".into() }]
            );
        }
    }

    #[test]
    fn test_sorted_children_folders_first() {
        let tree = build_tree(&map(&["/z.js", "/b/x.js", "/a.js", "/c/y.js"]));
        let names: Vec<_> = tree
            .root
            .sorted_children()
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "c", "a.js", "z.js"]);
    }
}
