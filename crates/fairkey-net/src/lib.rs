#![forbid(unsafe_code)]

//! HTTP layer for fairkey: a thin typed wrapper over `reqwest`.
//!
//! License servers and certificate hosts are plain HTTP endpoints; this
//! crate gives the rest of the workspace a small surface (`get_bytes`,
//! `post_bytes`) with explicit headers, per-request timeouts, and a
//! centralized error type. The [`Net`] trait is the seam for substituting
//! a fake transport in tests.

mod client;
mod error;
mod traits;
mod types;

pub use crate::{
    client::HttpClient,
    error::{NetError, NetResult},
    traits::Net,
    types::{Headers, NetOptions},
};
