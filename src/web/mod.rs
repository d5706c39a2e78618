pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
