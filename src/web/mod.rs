pub mod routes;
pub mod scheme;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
