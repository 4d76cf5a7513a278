//! Remote store client model shared by the browser app and its tests.
//!
//! This crate owns the hosted schema's row types, the read/filter/order
//! description used for table queries, change-feed events and subscription
//! guards, and the [`RemoteStore`] trait the client is written against.
//! [`MemoryStore`] implements the trait in-process.

mod error;
mod feed;
mod memory;
mod model;
mod query;
mod remote;

pub use error::StoreError;
pub use feed::{ChangeEvent, ChangeKind, EventFilter, FeedFilter, Subscription};
pub use memory::MemoryStore;
pub use model::{
    Channel, ChannelKind, DirectMessage, Friendship, FriendshipStatus, Insert, MemberRole, Message, NewChannel,
    NewMessage, NewProfile, NewServer, NewServerMember, PresenceStatus, Profile, Row, Server, ServerMember, Table,
};
pub use query::{Filter, Order, Query};
pub use remote::{AuthEvent, AuthEvents, AuthUser, REFRESH_MARGIN, RemoteStore, Session};
