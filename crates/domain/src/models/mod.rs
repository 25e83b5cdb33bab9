pub mod blog;
pub mod cliente;
pub mod page;
pub mod producto;
pub mod user;

mod lenient;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The admin-managed resources exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Blogs,
    Productos,
    Clientes,
    Users,
}

impl EntityKind {
    /// Whether the backend paginates this collection or returns it whole.
    pub fn is_server_paged(self) -> bool {
        matches!(self, EntityKind::Blogs | EntityKind::Productos)
    }
}
