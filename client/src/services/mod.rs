//! Store-facing operations used by pages and components.
//!
//! ARCHITECTURE
//! ============
//! Each function is generic over [`store::RemoteStore`], so the exact flows
//! the UI runs against the hosted backend are exercised in tests against
//! [`store::MemoryStore`]. Components own signals and spawning; services own
//! validation, read/write ordering and row shaping.

pub mod channels;
pub mod feed;
pub mod messages;
pub mod servers;
pub mod session;
