//! Web layer for the station finder.
//!
//! Provides JSON endpoints for station availability and rent/return
//! searches.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
