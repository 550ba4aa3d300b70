//! In-memory model of the host UI: elements, lookup, call arguments and owners.

pub mod args;
pub mod document;
pub mod element;

pub use args::{CallArg, Component, PropertyValue, UiEvent, ViewHandle};
pub use document::{Document, ElementQuery, Selector};
pub use element::{mark_locked, mark_unlocked, Element, WeakElement};
