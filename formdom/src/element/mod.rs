mod content;
mod node;

pub use content::Content;
pub use node::{Element, InputKind, Tag};

/// Strip a leading `#` from a selector-style id.
pub fn normalize_id(id: &str) -> &str {
    id.strip_prefix('#').unwrap_or(id)
}

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    for child in root.child_elements() {
        if let Some(found) = find_element(child, id) {
            return Some(found);
        }
    }

    None
}

/// Find an element by ID in the tree, mutably.
pub fn find_element_mut<'a>(root: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if root.id == id {
        return Some(root);
    }

    if let Content::Children(children) = &mut root.content {
        for child in children {
            if let Some(found) = find_element_mut(child, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Detach the element with the given ID from below `root`.
///
/// The root itself is never removed.
pub fn remove_element(root: &mut Element, id: &str) -> Option<Element> {
    let Content::Children(children) = &mut root.content else {
        return None;
    };

    if let Some(pos) = children.iter().position(|c| c.id == id) {
        return Some(children.remove(pos));
    }

    children.iter_mut().find_map(|child| remove_element(child, id))
}

/// Insert `element` directly after the sibling with the given ID.
///
/// Hands the element back when no such sibling exists below `root`.
pub fn insert_after(root: &mut Element, sibling_id: &str, element: Element) -> Result<(), Element> {
    let Content::Children(children) = &mut root.content else {
        return Err(element);
    };

    if let Some(pos) = children.iter().position(|c| c.id == sibling_id) {
        children.insert(pos + 1, element);
        return Ok(());
    }

    let mut element = element;
    for child in children.iter_mut() {
        match insert_after(child, sibling_id, element) {
            Ok(()) => return Ok(()),
            Err(back) => element = back,
        }
    }

    Err(element)
}

/// Collect `root` and all of its descendants in document order.
pub fn descendants(root: &Element) -> Vec<&Element> {
    let mut out = Vec::new();
    collect(root, &mut out);
    out
}

fn collect<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
    out.push(element);
    for child in element.child_elements() {
        collect(child, out);
    }
}
