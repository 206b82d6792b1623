//! selector pruning
//!
//! A selector offers named branches, only the chosen branch is active.
//!
//! ```text
//! .properties                  depth 1 (namespace)
//! └── choice                   depth 2 (selector, value "b")
//!     ├── a                    depth 3 (branch, not chosen) -> pruned
//!     │   └── x                depth 4 -> pruned
//!     └── b                    depth 3 (branch, chosen)
//!         └── y                depth 4 -> kept
//! ```
//!
//! Unchosen branch nodes and their direct children are pruned. Anything nested deeper than
//! depth 4 is left alone.
use crate::path::{PathTree, PropertyPath};
use std::collections::HashMap;

/// Chosen branch per selector path
pub type SelectorValues = HashMap<PropertyPath, String>;

/// Remove children of branches that were not chosen
///
/// Returns the paths that were pruned.
pub fn prune_unselected<T>(tree: &mut PathTree<T>, selectors: &SelectorValues) -> Vec<PropertyPath> {
    let mut pruned = vec![];

    for (namespace, namespace_node) in tree.root.iter_mut() {
        for (selector, selector_node) in namespace_node.children.iter_mut() {
            let selector_path = PropertyPath::from(vec![namespace.clone(), selector.clone()]);
            let Some(chosen) = selectors.get(&selector_path) else {
                continue;
            };

            for (branch, branch_node) in selector_node.children.iter_mut() {
                if branch.to_string() == *chosen {
                    continue;
                }

                if branch_node.value.take().is_some() {
                    let path = PropertyPath::from(vec![
                        namespace.clone(),
                        selector.clone(),
                        branch.clone(),
                    ]);
                    tracing::debug!(%path, %selector_path, %chosen, "pruned unselected branch");
                    pruned.push(path);
                }

                for (leaf, leaf_node) in branch_node.children.iter_mut() {
                    if leaf_node.value.take().is_some() {
                        let path = PropertyPath::from(vec![
                            namespace.clone(),
                            selector.clone(),
                            branch.clone(),
                            leaf.clone(),
                        ]);
                        tracing::debug!(%path, %selector_path, %chosen, "pruned unselected branch");
                        pruned.push(path);
                    }
                }
            }
        }
    }

    pruned
}

/// Filter a flat set of nodes by the chosen selector branches
pub fn filter<T>(
    extracted: impl IntoIterator<Item = (PropertyPath, T)>,
    selectors: &SelectorValues,
) -> Vec<(PropertyPath, T)> {
    let mut tree: PathTree<T> = extracted.into_iter().collect();
    prune_unselected(&mut tree, selectors);
    tree.into_entries()
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path(s: &str) -> PropertyPath {
        s.parse().unwrap()
    }

    fn filtered_paths(paths: &[&str], selectors: &[(&str, &str)]) -> Vec<String> {
        let selectors: SelectorValues = selectors
            .iter()
            .map(|(selector, chosen)| (path(selector), chosen.to_string()))
            .collect();

        let mut result: Vec<_> = filter(paths.iter().map(|p| (path(p), ())), &selectors)
            .into_iter()
            .map(|(path, ())| path.to_string())
            .collect();
        result.sort();
        result
    }

    #[test]
    fn keeps_only_chosen_branch() {
        let result = filtered_paths(
            &[
                ".properties.choice",
                ".properties.choice.a.x",
                ".properties.choice.b.y",
            ],
            &[(".properties.choice", "b")],
        );

        assert_eq!(result, vec![".properties.choice", ".properties.choice.b.y"]);
    }

    #[test]
    fn unrelated_paths_pass_through() {
        let result = filtered_paths(
            &[
                ".properties.other.a.x",
                ".properties.plain",
                ".job.choice.a.x",
            ],
            &[(".properties.choice", "b")],
        );

        assert_eq!(
            result,
            vec![".job.choice.a.x", ".properties.other.a.x", ".properties.plain"]
        );
    }

    #[test]
    fn selectors_are_scoped_by_namespace() {
        let result = filtered_paths(
            &[".job.choice.a.x", ".properties.choice.a.x"],
            &[(".job.choice", "a"), (".properties.choice", "b")],
        );

        assert_eq!(result, vec![".job.choice.a.x"]);
    }

    #[test]
    fn unselected_branch_node_is_pruned() {
        let result = filtered_paths(
            &[
                ".properties.choice",
                ".properties.choice.a",
                ".properties.choice.b",
            ],
            &[(".properties.choice", "b")],
        );

        assert_eq!(result, vec![".properties.choice", ".properties.choice.b"]);
    }

    /// Known boundary: descendants below the direct children of a branch are kept.
    #[test]
    fn deeper_descendants_of_unselected_branch_are_kept() {
        let result = filtered_paths(
            &[
                ".properties.choice.a",
                ".properties.choice.a.x",
                ".properties.choice.a.x.deep",
            ],
            &[(".properties.choice", "b")],
        );

        assert_eq!(result, vec![".properties.choice.a.x.deep"]);
    }

    #[test]
    fn prune_reports_removed_paths() {
        let mut tree: PathTree<u8> = [
            (path(".properties.choice.a"), 0),
            (path(".properties.choice.a.x"), 1),
            (path(".properties.choice.b.y"), 2),
        ]
        .into_iter()
        .collect();
        let selectors = SelectorValues::from([(path(".properties.choice"), "b".to_string())]);

        let pruned = prune_unselected(&mut tree, &selectors);

        assert_eq!(
            pruned,
            vec![path(".properties.choice.a"), path(".properties.choice.a.x")]
        );
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(&path(".properties.choice.b.y")), Some(&2));
    }
}
