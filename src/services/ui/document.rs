//! Element lookup by simple CSS selectors.
//!
//! Supports compound selectors made of an optional tag, an optional `#id`
//! and any number of `.class` parts (`button`, `#save-btn`, `button.primary`).
//! Combinators and selector lists are not supported.

use regex::Regex;
use std::sync::{LazyLock, Mutex};

use super::element::Element;
use crate::types::errors::{LockError, LockResult};

static SELECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9-]*)?(#[A-Za-z_][\w-]*)?((?:\.[A-Za-z_][\w-]*)*)$")
        .expect("valid selector regex")
});

/// Lookup seam used by the selector locator.
pub trait ElementQuery: Send + Sync {
    /// First element matching `selector`, in document order.
    fn query_selector(&self, selector: &str) -> LockResult<Option<Element>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    pub fn parse(selector: &str) -> LockResult<Self> {
        let trimmed = selector.trim();
        if trimmed.is_empty() {
            return Err(LockError::Configuration("selector is required".to_string()));
        }
        let caps = SELECTOR_RE.captures(trimmed).ok_or_else(|| {
            LockError::Configuration(format!("unsupported selector '{trimmed}'"))
        })?;

        let tag = caps.get(1).map(|m| m.as_str().to_ascii_lowercase());
        let id = caps.get(2).map(|m| m.as_str()[1..].to_string());
        let classes = caps
            .get(3)
            .map(|m| {
                m.as_str()
                    .split('.')
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { tag, id, classes })
    }

    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag() != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| element.has_class(class))
    }
}

/// Flat, ordered collection of the elements currently mounted by the host.
#[derive(Default)]
pub struct Document {
    elements: Mutex<Vec<Element>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, element: Element) {
        self.elements
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(element);
    }

    /// Unmount an element. Returns `false` if it was not mounted.
    pub fn remove(&self, element: &Element) -> bool {
        let mut elements = self.elements.lock().unwrap_or_else(|p| p.into_inner());
        let before = elements.len();
        elements.retain(|e| e != element);
        elements.len() != before
    }

    pub fn len(&self) -> usize {
        self.elements.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ElementQuery for Document {
    fn query_selector(&self, selector: &str) -> LockResult<Option<Element>> {
        let selector = Selector::parse(selector)?;
        let elements = self.elements.lock().unwrap_or_else(|p| p.into_inner());
        Ok(elements.iter().find(|e| selector.matches(e)).cloned())
    }
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
