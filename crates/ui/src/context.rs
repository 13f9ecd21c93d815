use std::sync::Arc;

use dioxus::prelude::*;

use dscode_core::model::Catalog;
use services::AppServices;

/// UI-facing handle to the service layer.
///
/// Provided by the application composition root (`crates/app`) via
/// `LaunchBuilder::with_context`, so every view reaches services through
/// `use_context::<AppContext>()`.
#[derive(Clone)]
pub struct AppContext {
    services: AppServices,
}

impl AppContext {
    #[must_use]
    pub fn new(services: AppServices) -> Self {
        Self { services }
    }

    #[must_use]
    pub fn services(&self) -> &AppServices {
        &self.services
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.services.catalog)
    }
}

/// Shared reactive state, provided once at the root.
///
/// `revision` is a coarse invalidation counter: views subscribe to it and
/// re-map their view-models from the services after every mutation. The
/// service layer stays the single source of truth; signals only carry the
/// "something changed" pulse.
#[derive(Clone, Copy)]
pub struct UiState {
    pub dark_mode: Signal<bool>,
    pub revision: Signal<u64>,
}

impl UiState {
    pub fn bump(mut self) {
        self.revision += 1;
    }
}
