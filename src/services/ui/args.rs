//! Call arguments and owner properties as seen by target locators.

use super::element::Element;

/// A UI event carrying the element that fired it.
#[derive(Debug, Clone, Default)]
pub struct UiEvent {
    pub kind: String,
    pub target: Option<Element>,
    pub current_target: Option<Element>,
}

impl UiEvent {
    /// A click whose `target` and `current_target` are both `element`.
    pub fn click(element: &Element) -> Self {
        Self {
            kind: "click".to_string(),
            target: Some(element.clone()),
            current_target: Some(element.clone()),
        }
    }

    pub fn with_target(kind: &str, target: &Element) -> Self {
        Self {
            kind: kind.to_string(),
            target: Some(target.clone()),
            current_target: None,
        }
    }
}

/// One positional argument of a guarded call.
#[derive(Debug, Clone)]
pub enum CallArg {
    Element(Element),
    Event(UiEvent),
    Value(serde_json::Value),
}

impl CallArg {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            CallArg::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<&Element> {
        match self {
            CallArg::Event(event) => event.target.as_ref(),
            _ => None,
        }
    }

    pub fn current_target(&self) -> Option<&Element> {
        match self {
            CallArg::Event(event) => event.current_target.as_ref(),
            _ => None,
        }
    }
}

impl From<Element> for CallArg {
    fn from(element: Element) -> Self {
        CallArg::Element(element)
    }
}

impl From<UiEvent> for CallArg {
    fn from(event: UiEvent) -> Self {
        CallArg::Event(event)
    }
}

impl From<serde_json::Value> for CallArg {
    fn from(value: serde_json::Value) -> Self {
        CallArg::Value(value)
    }
}

/// Framework view handle wrapping a rendered element.
#[derive(Debug, Clone, Default)]
pub struct ViewHandle {
    pub native_element: Option<Element>,
}

impl ViewHandle {
    pub fn new(element: &Element) -> Self {
        Self {
            native_element: Some(element.clone()),
        }
    }
}

/// A named property read off an owner.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Element(Element),
    View(ViewHandle),
    Value(serde_json::Value),
}

/// The object owning guarded methods ("self" of the call).
pub trait Component {
    fn property(&self, _name: &str) -> Option<PropertyValue> {
        None
    }
}

impl Component for () {}
