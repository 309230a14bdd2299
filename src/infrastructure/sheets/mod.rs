pub mod auth;
pub mod http_client;
pub mod source_table;
