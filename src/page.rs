//! Component E from spec.md §4.E: pages are allocated once per unique
//! discovered title, linked to their discoverer by an immutable parent
//! pointer. Path reconstruction walks that chain back to the seed.

use std::sync::Arc;

/// A node in the discovery tree. Immutable after construction — the
/// parent pointer is set once, at birth, and never mutated, so any
/// number of callbacks can read `path()` concurrently without locking.
#[derive(Debug)]
pub struct Page {
    pub title: String,
    pub parent: Option<Arc<Page>>,
    pub depth: usize,
}

impl Page {
    /// Constructs the seed page for a race: depth 0, no parent.
    pub fn root(title: impl Into<String>) -> Arc<Page> {
        Arc::new(Page {
            title: title.into(),
            parent: None,
            depth: 0,
        })
    }

    /// Constructs a page discovered as a link from `parent`.
    pub fn child(title: impl Into<String>, parent: &Arc<Page>) -> Arc<Page> {
        Arc::new(Page {
            title: title.into(),
            parent: Some(parent.clone()),
            depth: parent.depth + 1,
        })
    }

    /// Walks parent pointers back to the seed and reverses, yielding the
    /// titles from start to this page in discovery order.
    pub fn path(&self) -> Vec<String> {
        let mut titles = vec![self.title.clone()];
        let mut current = self.parent.clone();
        while let Some(page) = current {
            titles.push(page.title.clone());
            current = page.parent.clone();
        }
        titles.reverse();
        titles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_depth_zero_and_no_parent() {
        let root = Page::root("Football");
        assert_eq!(root.depth, 0);
        assert!(root.parent.is_none());
        assert_eq!(root.path(), vec!["Football".to_string()]);
    }

    #[test]
    fn child_depth_is_parent_depth_plus_one() {
        let root = Page::root("Football");
        let child = Page::child("Association football", &root);
        assert_eq!(child.depth, 1);
        assert!(Arc::ptr_eq(child.parent.as_ref().unwrap(), &root));
    }

    #[test]
    fn path_reconstructs_start_to_end_in_order() {
        let root = Page::root("A");
        let b = Page::child("B", &root);
        let c = Page::child("C", &b);
        assert_eq!(c.path(), vec!["A".to_string(), "B".to_string(), "C".to_string()]);
    }

    #[test]
    fn continuation_pages_sharing_a_parent_produce_identical_prefixes() {
        let root = Page::root("A");
        let b1 = Page::child("B", &root);
        let b2 = Page::child("B", &root);
        assert_eq!(b1.path(), b2.path());
    }
}
