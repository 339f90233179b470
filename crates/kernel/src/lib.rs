//! Core building blocks shared by every storefront crate: layered settings,
//! the [`Module`] trait implemented by each view, and the registry that drives
//! module lifecycles.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
pub use settings::Settings;
