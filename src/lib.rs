//! # Proteus - Schema-Driven Form Engine
//!
//! Proteus renders and validates forms whose structure is not known at build
//! time but described by a declarative schema fetched at runtime: nested
//! field groups, conditional visibility, per-field validation rules, and
//! option lists that depend on the live value of another field.
//!
//! ## Features
//!
//! - **Schema model**: tolerant parsing of untyped wire schemas; unknown
//!   field types render as nothing instead of failing the form
//! - **Visibility**: pure `equals` conditions with a permissive default
//! - **Dynamic options**: cached dependent option lists with stale-response
//!   fencing and dependency-indexed refresh
//! - **Validation**: recursive, visibility-aware, idempotent
//! - **Controller**: Loading/Ready/Submitting state machine over pluggable
//!   schema/options/submission ports
//! - **Demo server**: the original insurance-form catalog and options
//!   endpoints, served over REST
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use proteus::adapters::{CatalogSchemaSource, InMemorySubmissionStore, StaticOptionsSource};
//! use proteus::engine::FormController;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = proteus::config::Settings::new()?;
//!     let mut controller = FormController::new(
//!         Arc::new(CatalogSchemaSource::new(settings.forms)),
//!         Arc::new(StaticOptionsSource::states()),
//!         Arc::new(InMemorySubmissionStore::new()),
//!     );
//!     controller.load("home_insurance").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Hexagonal layout:
//! - **Domain**: schema model, values, visibility, validation, ports
//! - **Engine**: option resolver, render derivation, controller
//! - **Adapters**: HTTP and in-memory port implementations, REST handlers
//! - **Config**: settings and startup schema validation

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::submission_store::InMemorySubmissionStore;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Creates the Axum application router with all endpoints configured.
pub fn create_app(
    settings: Arc<RwLock<config::Settings>>,
    store: InMemorySubmissionStore,
) -> Router {
    let api_state = ApiState { settings, store };

    let api_router = Router::new()
        .route("/forms", get(api_handler::list_forms))
        .route("/forms/:form_id", get(api_handler::get_form))
        .route("/forms/:form_id/submissions", post(api_handler::submit_form))
        .route("/options/states", get(api_handler::state_options))
        .route("/submissions", get(api_handler::list_submissions))
        .with_state(api_state);

    let router = Router::new()
        .route("/health", get(api_handler::health))
        .nest("/api", api_router);

    router.layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
