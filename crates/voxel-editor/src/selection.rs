//! Single-holder selection and hover markers.
//!
//! Both markers are attributes on the live tree. Setting either one always
//! clears it from the previous holder first, so at most one element carries
//! each marker at any time.

use voxel_dom::{ElementData, NodeId};

use crate::live_tree::LiveTree;

/// Tracks the selected and hovered elements of one [`LiveTree`].
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    selection_attribute: String,
    hover_attribute: String,
    path_separator: String,
    selected: Option<NodeId>,
    hovered: Option<NodeId>,
    path: String,
}

impl SelectionTracker {
    /// Tracker using the given marker attribute names.
    #[must_use]
    pub fn new(selection_attribute: &str, hover_attribute: &str, path_separator: &str) -> Self {
        Self {
            selection_attribute: selection_attribute.to_string(),
            hover_attribute: hover_attribute.to_string(),
            path_separator: path_separator.to_string(),
            selected: None,
            hovered: None,
            path: String::new(),
        }
    }

    /// The selected element.
    #[must_use]
    pub const fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// The hovered element.
    #[must_use]
    pub const fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Structural path of the selection, empty when nothing is selected.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Move the selection marker to `target`.
    ///
    /// `None`, a root container or a node that is not a selectable element
    /// all mean "select nothing". Returns the new selection.
    pub fn select(&mut self, live: &mut LiveTree, target: Option<NodeId>) -> Option<NodeId> {
        let target = target.filter(|&id| live.is_selectable(id));
        move_marker(live, &self.selection_attribute, self.selected, target);
        self.selected = target;
        self.path = target.map_or_else(String::new, |id| structural_path(live, id, &self.path_separator));
        tracing::debug!(path = %self.path, "selection changed");
        target
    }

    /// Move the hover marker to `target`. Same single-holder rule as
    /// [`Self::select`], without a path.
    pub fn hover(&mut self, live: &mut LiveTree, target: Option<NodeId>) -> Option<NodeId> {
        let target = target.filter(|&id| live.is_selectable(id));
        move_marker(live, &self.hover_attribute, self.hovered, target);
        self.hovered = target;
        target
    }

    /// Drop both markers.
    pub fn clear(&mut self, live: &mut LiveTree) {
        let _ = self.select(live, None);
        let _ = self.hover(live, None);
    }

    /// Forget holders that are no longer attached to the document.
    ///
    /// Called after structural mutations; a removed element cannot stay
    /// selected.
    pub fn forget_detached(&mut self, live: &LiveTree) {
        if self.selected.is_some_and(|id| !live.is_connected(id)) {
            self.selected = None;
            self.path.clear();
        }
        if self.hovered.is_some_and(|id| !live.is_connected(id)) {
            self.hovered = None;
        }
    }

    /// Reset for a freshly rendered tree. Old node ids mean nothing there.
    pub fn reset(&mut self) {
        self.selected = None;
        self.hovered = None;
        self.path.clear();
    }
}

fn move_marker(live: &mut LiveTree, attribute: &str, previous: Option<NodeId>, next: Option<NodeId>) {
    let tree = live.tree_mut();
    if let Some(previous) = previous
        && let Some(element) = tree.as_element_mut(previous)
    {
        let _ = element.attrs.remove(attribute);
    }
    // A marker copied by hand or left by another tool is still "a holder".
    for stray in tree.elements_with_attribute(attribute) {
        if let Some(element) = tree.as_element_mut(stray) {
            let _ = element.attrs.remove(attribute);
        }
    }
    if let Some(next) = next
        && let Some(element) = tree.as_element_mut(next)
    {
        let _ = element.attrs.set(attribute, "true");
    }
}

/// `html > body > div#main > p.lead` style path from the document element
/// down to `id`.
#[must_use]
pub fn structural_path(live: &LiveTree, id: NodeId, separator: &str) -> String {
    let tree = live.tree();
    let mut segments: Vec<String> = std::iter::once(id)
        .chain(tree.ancestors(id))
        .filter_map(|n| tree.as_element(n))
        .map(path_segment)
        .collect();
    segments.reverse();
    segments.join(separator)
}

fn path_segment(element: &ElementData) -> String {
    if let Some(id) = element.id() {
        format!("{}#{id}", element.tag_name)
    } else if let Some(class) = element.classes().next() {
        format!("{}.{class}", element.tag_name)
    } else {
        element.tag_name.clone()
    }
}
