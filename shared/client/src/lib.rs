//! # Flexiflo Client State
//!
//! State containers behind the job sheet and final inspection forms.
//!
//! - [`FormStore`]: the editable form, its field errors and notices, plus
//!   the list and detail views of the collection
//! - [`FetchState`]: loading/error/data for one view, with stale-response
//!   protection
//! - [`ResourceApi`]: how the stores talk to the server; [`HttpResourceApi`]
//!   is the HTTP implementation
//!
//! Submissions are validated with the same schema the server uses before
//! anything is sent.

pub mod api;
pub mod document;
pub mod fetch;
pub mod form;
pub mod state;

#[cfg(test)]
mod store_tests;

pub use api::{ApiFailure, ApiResult, HttpResourceApi, ResourceApi};
pub use document::FormDocument;
pub use fetch::{FetchState, FetchTicket};
pub use form::{FormMode, FormStore, Notice};
pub use state::FormState;
