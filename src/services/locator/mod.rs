//! Target locators: find the element to mark while a guard is locked.
//!
//! Each strategy is configured once (selector, property name, argument index)
//! and resolved lazily on every admitted call. Configuration problems are
//! therefore reported at resolution time, never at construction.

use std::sync::Arc;

use crate::services::ui::{CallArg, Component, Element, ElementQuery, PropertyValue};
use crate::types::errors::{LockError, LockResult};

/// Resolve the target element of a call from its owner and arguments.
pub trait TargetLocator: Send + Sync {
    fn locate(&self, owner: &dyn Component, args: &[CallArg]) -> LockResult<Element>;
}

impl<F> TargetLocator for F
where
    F: Fn(&dyn Component, &[CallArg]) -> LockResult<Element> + Send + Sync,
{
    fn locate(&self, owner: &dyn Component, args: &[CallArg]) -> LockResult<Element> {
        self(owner, args)
    }
}

// ─── By Selector ─────────────────────────────────────────────────────────────

/// Look the target up in `document` by CSS selector.
pub fn by_selector(document: Arc<dyn ElementQuery>, selector: &str) -> Arc<dyn TargetLocator> {
    Arc::new(SelectorLocator {
        document,
        selector: selector.to_string(),
    })
}

struct SelectorLocator {
    document: Arc<dyn ElementQuery>,
    selector: String,
}

impl TargetLocator for SelectorLocator {
    fn locate(&self, _owner: &dyn Component, _args: &[CallArg]) -> LockResult<Element> {
        if self.selector.trim().is_empty() {
            return Err(LockError::Configuration("selector is required".to_string()));
        }
        self.document
            .query_selector(&self.selector)?
            .ok_or_else(|| LockError::NotFound(format!("Element not found for '{}'", self.selector)))
    }
}

// ─── By Owner Property ───────────────────────────────────────────────────────

/// Use a named property of the owner: an element, or a view handle wrapping one.
pub fn by_property(name: &str) -> Arc<dyn TargetLocator> {
    Arc::new(PropertyLocator {
        name: name.to_string(),
    })
}

struct PropertyLocator {
    name: String,
}

impl TargetLocator for PropertyLocator {
    fn locate(&self, owner: &dyn Component, _args: &[CallArg]) -> LockResult<Element> {
        if self.name.is_empty() {
            return Err(LockError::Configuration("property is required".to_string()));
        }
        match owner.property(&self.name) {
            Some(PropertyValue::Element(element)) => Ok(element),
            Some(PropertyValue::View(view)) => view.native_element.ok_or_else(|| {
                LockError::InvalidTarget(format!(
                    "property '{}' is a view without a native element",
                    self.name
                ))
            }),
            Some(PropertyValue::Value(serde_json::Value::Null)) | None => Err(
                LockError::NotFound(format!("property '{}' not found", self.name)),
            ),
            Some(PropertyValue::Value(_)) => Err(LockError::InvalidTarget(format!(
                "property '{}' must be an element or a view with a native element",
                self.name
            ))),
        }
    }
}

// ─── By Call Argument ────────────────────────────────────────────────────────

/// Use a call argument: the one at `index`, or the first qualifying one.
///
/// An argument qualifies through its `current_target`, then its `target`,
/// then by being an element itself. When scanning, each of those rules is
/// tried across all arguments before falling back to the next rule.
pub fn by_argument(index: Option<isize>) -> Arc<dyn TargetLocator> {
    Arc::new(ArgumentLocator { index })
}

struct ArgumentLocator {
    index: Option<isize>,
}

impl TargetLocator for ArgumentLocator {
    fn locate(&self, _owner: &dyn Component, args: &[CallArg]) -> LockResult<Element> {
        if args.is_empty() {
            return Err(LockError::NotFound("method without arguments".to_string()));
        }

        let Some(index) = self.index else {
            return args
                .iter()
                .find_map(CallArg::current_target)
                .or_else(|| args.iter().find_map(CallArg::target))
                .or_else(|| args.iter().find_map(CallArg::as_element))
                .cloned()
                .ok_or_else(|| LockError::NotFound("no element argument found".to_string()));
        };

        if index < 0 {
            return Err(LockError::Configuration(
                "argument index must be greater than or equal to 0".to_string(),
            ));
        }
        let arg = args.get(index as usize).ok_or_else(|| {
            LockError::Configuration(format!(
                "argument index {index} out of range for {} arguments",
                args.len()
            ))
        })?;

        arg.current_target()
            .or_else(|| arg.target())
            .or_else(|| arg.as_element())
            .cloned()
            .ok_or_else(|| {
                LockError::InvalidTarget(format!(
                    "argument {index} is not an element and has no target or current target"
                ))
            })
    }
}

#[cfg(test)]
#[path = "tests/locator_tests.rs"]
mod tests;
