//! Networking modules for the hosted backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `rest` implements [`store::RemoteStore`] over HTTP for table access and
//! auth, and `realtime` carries change feeds over websockets.

pub mod realtime;
pub mod rest;

/// Store implementation the app runs against.
pub type AppStore = rest::RestStore;
