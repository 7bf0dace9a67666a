pub mod auth;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod flash;
pub mod forum;
pub mod middleware;
pub mod reconcile;
pub mod routes;
pub mod views;

pub use context::{AppContext, AppState};
pub use error::ApiError;
pub use routes::router;
