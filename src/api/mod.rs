//! # Backend Boundary
//!
//! Everything DocChat knows about the remote question-answering service
//! lives here: the wire types for `/status`, `/upload`, and `/ask`, the
//! [`Backend`] trait, and the reqwest-based [`HttpBackend`].
//!
//! The rest of the crate only sees `Backend` — tests swap in a scripted
//! double without touching the network.

pub mod client;
pub mod types;

pub use client::{ApiError, Backend, HttpBackend};
pub use types::{AskRequest, AskResponse, ErrorBody, ErrorDetail, StatusResponse, UploadResponse};
