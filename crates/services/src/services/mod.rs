pub mod api_client;
pub mod endpoints;
pub mod export;
pub mod forms;
pub mod notification;
pub mod pagination;
pub mod preferences;
pub mod resource;
pub mod search;
pub mod session;
pub mod store;
pub mod table;
pub mod validation;
