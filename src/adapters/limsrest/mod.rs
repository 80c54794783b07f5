//! LimsRest adapter implementation
//!
//! This module provides the integration with the LimsRest service: the
//! authenticated transport, endpoint construction, the [`LimsSource`] trait
//! and its HTTP-backed [`LimsRestClient`].

pub mod client;
pub mod endpoints;
pub mod source;
pub mod transport;

pub use client::{select_manifest, LimsRestClient};
pub use endpoints::Endpoints;
pub use source::LimsSource;
pub use transport::{HttpTransport, Transport};
