// Interface adapters: HTTP transport, storage and routing glue.

pub mod clients;
pub mod error_classifier;
pub mod flag_storage;
pub mod navigator;
pub mod protocol;
pub mod request_guard;

pub use clients::HttpIdentityService;
pub use error_classifier::{TransportFailure, classify};
pub use flag_storage::{FileFlagStorage, InMemoryFlagStorage};
pub use navigator::ChannelNavigator;
pub use request_guard::RequestGuard;
