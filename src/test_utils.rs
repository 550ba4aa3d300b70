use std::sync::Once;

use crate::services::ui::{CallArg, Element, UiEvent};

static INIT: Once = Once::new();

/// Install `env_logger` once so verbose guards print during `cargo test`.
pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Arguments of a click handler fired by `element`.
pub fn click_args(element: &Element) -> Vec<CallArg> {
    vec![CallArg::Event(UiEvent::click(element))]
}
