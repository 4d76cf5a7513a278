//! Server list loading and the three-step server creation flow.
//!
//! ERROR HANDLING
//! ==============
//! Creation issues three independent writes with no compensation. When a
//! later step fails the server row already exists; [`CreateServerError`]
//! names the step and the orphaned server id so the failure is explicit
//! rather than silently leaving a server nobody can see.

#[cfg(test)]
#[path = "servers_test.rs"]
mod servers_test;

use store::{
    Channel, ChannelKind, FeedFilter, MemberRole, NewChannel, NewServer, NewServerMember, Query, RemoteStore, Server,
    ServerMember, StoreError, Table,
};
use uuid::Uuid;

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

/// Name of the text channel every new server starts with.
pub const DEFAULT_CHANNEL: &str = "general";

/// Servers the user is a member of, oldest first.
///
/// # Errors
///
/// Returns the first failing read.
pub async fn load_servers<S: RemoteStore>(store: &S, user_id: Uuid) -> Result<Vec<Server>, StoreError> {
    let memberships: Vec<ServerMember> =
        store.fetch_all(&Query::from(Table::ServerMembers).eq("user_id", user_id)).await?;
    if memberships.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = memberships.iter().map(|m| m.server_id).collect();
    store
        .fetch_all(&Query::from(Table::Servers).is_in("id", ids).order_by("created_at", true))
        .await
}

/// Any membership change for the user re-reads the server list.
#[must_use]
pub fn membership_feed(user_id: Uuid) -> FeedFilter {
    FeedFilter::table(Table::ServerMembers).where_eq("user_id", user_id)
}

/// Every `servers` change. The rail re-reads when one touches a listed
/// server (see [`crate::state::servers::ServerListState::affected_by`]).
#[must_use]
pub fn server_feed() -> FeedFilter {
    FeedFilter::table(Table::Servers)
}

/// Validated create-server input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerInput {
    pub name: String,
    pub description: String,
}

/// # Errors
///
/// Returns a user-facing message for the first invalid field.
pub fn validate_server_input(name: &str, description: &str) -> Result<ServerInput, &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Server name is required.");
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err("Server name must be 100 characters or fewer.");
    }
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err("Description must be 500 characters or fewer.");
    }
    Ok(ServerInput { name: name.to_owned(), description: description.to_owned() })
}

/// Which write of the creation flow failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateServerStep {
    Server,
    Membership,
    DefaultChannel,
}

impl CreateServerStep {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Membership => "membership",
            Self::DefaultChannel => "default channel",
        }
    }
}

/// A failed creation step. Displays the backend's message verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{source}")]
pub struct CreateServerError {
    pub step: CreateServerStep,
    /// Set when the server row was written before the failure.
    pub orphaned_server: Option<Uuid>,
    #[source]
    pub source: StoreError,
}

/// Rows written by a successful creation.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatedServer {
    pub server: Server,
    pub membership: ServerMember,
    pub channel: Channel,
}

/// Insert server, owner membership and default channel, in that order.
///
/// # Errors
///
/// Returns [`CreateServerError`] naming the first failed step.
pub async fn create_server<S: RemoteStore>(
    store: &S,
    owner_id: Uuid,
    input: &ServerInput,
) -> Result<CreatedServer, CreateServerError> {
    let server = store
        .insert_row(&NewServer { name: input.name.clone(), description: input.description.clone(), owner_id })
        .await
        .map_err(|source| CreateServerError { step: CreateServerStep::Server, orphaned_server: None, source })?;

    let orphaned = |step: CreateServerStep| {
        let server_id = server.id;
        move |source| CreateServerError { step, orphaned_server: Some(server_id), source }
    };

    let membership = store
        .insert_row(&NewServerMember { server_id: server.id, user_id: owner_id, role: MemberRole::Owner })
        .await
        .map_err(orphaned(CreateServerStep::Membership))?;

    let channel = store
        .insert_row(&NewChannel {
            server_id: server.id,
            name: DEFAULT_CHANNEL.to_owned(),
            kind: ChannelKind::Text,
            position: 0,
        })
        .await
        .map_err(orphaned(CreateServerStep::DefaultChannel))?;

    Ok(CreatedServer { server, membership, channel })
}
