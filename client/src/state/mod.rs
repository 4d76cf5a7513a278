//! Client state modules shared across pages and components.
//!
//! DESIGN
//! ======
//! State types are plain structs held in `RwSignal`s. They carry no
//! networking; services produce results and these types decide whether and
//! how to apply them.

pub mod channels;
pub mod feed;
pub mod messages;
pub mod nav;
pub mod servers;
pub mod session;
pub mod theme;
