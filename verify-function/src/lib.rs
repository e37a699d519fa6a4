//! Captcha Verify - reCAPTCHA token verification proxy.
//!
//! A browser submits the token produced by the reCAPTCHA widget; the function
//! forwards it with the shared secret to Google's `siteverify` API and relays
//! the result back with CORS headers.
//!
//! ## Flow
//!
//! ```text
//! Browser → Event → Handler → Verifier (siteverify) → Envelope → Browser
//! ```
//!
//! Every response is an [`Envelope`] with status 200; outcomes are only
//! distinguishable by the `error` field of the body.

pub mod config;
pub mod event;
pub mod handler;
pub mod verify;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use event::{Envelope, Event, CORS_HEADERS};
pub use handler::Handler;
pub use verify::{HttpVerifier, SiteVerifyRequest, UpstreamResponse, Verifier, VerifyError};
