pub mod errors;
pub mod routes;
pub mod startup;
pub mod uploads;

pub use routes::auth::{CurrentUser, ServerAuthConfig, ServerState};
pub use routes::build_router;
pub use startup::run;
