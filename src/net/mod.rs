pub mod chat;
pub mod error;
pub mod export;
pub mod http_client;
pub mod profile;
pub mod resource;
pub mod transport;
pub mod users;
