//! Parameter panel loader for a build-trigger configuration form.
//!
//! When the user finishes editing the job reference field, the panel fetches
//! that job's parameter definitions from the descriptor endpoint and swaps
//! the returned HTML fragment into place. The host supplies a rehydration
//! callback that is run over freshly inserted markup so nested interactive
//! widgets become live.
//!
//! Wiring is explicit: the host creates a `NodeRef` for the panel, hands it
//! to both [`PanelLoader`] and [`ParamsPanel`], and binds the loader to a
//! [`JobReferenceField`]. See the `demo` feature for a complete page.

pub mod api;
pub mod loader;
pub mod panel;

#[cfg(feature = "demo")]
pub mod demo;

pub use api::{fetch_parameters, parameters_url, LoadError};
pub use loader::PanelLoader;
pub use panel::{JobReferenceField, ParamsPanel};
