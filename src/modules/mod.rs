pub mod catalog;
pub mod product;

use storefront_kernel::ModuleRegistry;

use crate::services::Services;

/// Register the storefront views with the registry
pub fn register_all(registry: &mut ModuleRegistry, services: &Services) {
    registry.register(catalog::create_module(services.clone()));
    registry.register(product::create_module(services.clone()));
}
