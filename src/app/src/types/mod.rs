//! Domain-based type organization
//!
//! Types are organized by domain to match the structure in `update/`:
//! - door: door status, icons and layout
//! - view: views, visibility and messages
//! - settings: credential updates and WiFi scan results
//! - device_config: configuration reported by the device
//! - preference: persisted panel preferences
//! - timer: named timer handles

pub mod device_config;
pub mod door;
pub mod preference;
pub mod settings;
pub mod timer;
pub mod view;

pub use device_config::*;
pub use door::*;
pub use preference::*;
pub use settings::*;
pub use timer::*;
pub use view::*;
