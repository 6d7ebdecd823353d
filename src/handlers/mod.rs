//! HTTP request handlers.
//!
//! `auth` owns the login/logout pages and the session-cookie guard that
//! fronts every admin route. `admin` hosts the editor, preview, library and
//! entry mutations. `public` serves the unauthenticated surface.

pub mod admin;
pub mod auth;
pub mod public;
