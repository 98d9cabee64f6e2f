// Domain layer: session model, error shape, routes and ports.

pub mod entities;
pub mod errors;
pub mod navigation;
pub mod ports;

pub use entities::{Credentials, Identity, Registration, Role, SessionState, SessionStatus};
pub use errors::{AuthError, ErrorCategory, NormalizedError};
pub use navigation::{Route, landing_route_for, route_after_error};
pub use ports::{FlagStorage, IdentityService, Navigator, ProviderSignOut};
