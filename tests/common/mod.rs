#![allow(dead_code)]

use std::sync::Once;

use ui_lock::services::ui::{CallArg, Element, UiEvent};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub fn click(element: &Element) -> Vec<CallArg> {
    vec![CallArg::Event(UiEvent::click(element))]
}
