//! URL handling module for Sumi-Seek
//!
//! Crawls only follow links that live under the configured base origin. This
//! module resolves raw `href` values against that origin and decides which of
//! them stay in scope.

mod scope;

pub use scope::BaseOrigin;
