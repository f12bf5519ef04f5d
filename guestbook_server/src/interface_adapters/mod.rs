pub mod clients;
pub mod handlers;
pub mod headers;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod stores;
pub mod view;
