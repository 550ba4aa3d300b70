pub mod locator;
pub mod lock;
pub mod reflector;
pub mod transport;
pub mod ui;
