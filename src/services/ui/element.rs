//! DOM-like element handles.
//!
//! An `Element` is a cheap, clonable handle to a node owned by the host UI.
//! The lock machinery only ever keeps a `WeakElement`, so a node torn down
//! by the host before release simply stops being marked.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

pub const DISABLED_ATTR: &str = "disabled";
pub const ARIA_DISABLED_ATTR: &str = "aria-disabled";

struct ElementNode {
    tag: String,
    id: Option<String>,
    classes: Mutex<BTreeSet<String>>,
    attributes: Mutex<BTreeMap<String, String>>,
}

/// Strong handle to a UI element. Equality is node identity.
#[derive(Clone)]
pub struct Element {
    node: Arc<ElementNode>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            node: Arc::new(ElementNode {
                tag: tag.to_ascii_lowercase(),
                id: None,
                classes: Mutex::new(BTreeSet::new()),
                attributes: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    /// Build an element with an id and an initial class list.
    pub fn build(tag: &str, id: Option<&str>, classes: &[&str]) -> Self {
        Self {
            node: Arc::new(ElementNode {
                tag: tag.to_ascii_lowercase(),
                id: id.map(str::to_string),
                classes: Mutex::new(classes.iter().map(|c| c.to_string()).collect()),
                attributes: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    pub fn tag(&self) -> &str {
        &self.node.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.node.id.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().contains(class)
    }

    pub fn add_class(&self, class: &str) {
        self.classes().insert(class.to_string());
    }

    pub fn remove_class(&self, class: &str) {
        self.classes().remove(class);
    }

    /// Space-separated class list, like `Element.className`.
    pub fn class_name(&self) -> String {
        self.classes()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes().get(name).cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes().contains_key(name)
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.attributes()
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, name: &str) {
        self.attributes().remove(name);
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement {
            node: Arc::downgrade(&self.node),
        }
    }

    fn classes(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        self.node.classes.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn attributes(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.node.attributes.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Element");
        out.field("tag", &self.node.tag);
        if let Some(id) = &self.node.id {
            out.field("id", id);
        }
        out.field("class", &self.class_name()).finish()
    }
}

/// Back reference to an element; never keeps the node alive.
#[derive(Clone, Default)]
pub struct WeakElement {
    node: Weak<ElementNode>,
}

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.node.upgrade().map(|node| Element { node })
    }

    pub fn is_alive(&self) -> bool {
        self.node.strong_count() > 0
    }
}

impl fmt::Debug for WeakElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(element) => f.debug_tuple("WeakElement").field(&element).finish(),
            None => f.write_str("WeakElement(<dropped>)"),
        }
    }
}

// ─── Lock Marking ────────────────────────────────────────────────────────────

/// Apply the locked presentation: class (when configured) plus disabled markers.
pub fn mark_locked(element: &Element, locked_class: Option<&str>) {
    if let Some(class) = locked_class.filter(|c| !c.is_empty()) {
        element.add_class(class);
    }
    element.set_attribute(DISABLED_ATTR, DISABLED_ATTR);
    element.set_attribute(ARIA_DISABLED_ATTR, "true");
}

/// Undo `mark_locked`.
pub fn mark_unlocked(element: &Element, locked_class: Option<&str>) {
    if let Some(class) = locked_class.filter(|c| !c.is_empty()) {
        element.remove_class(class);
    }
    element.remove_attribute(DISABLED_ATTR);
    element.remove_attribute(ARIA_DISABLED_ATTR);
}
