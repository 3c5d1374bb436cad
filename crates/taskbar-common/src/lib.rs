pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, HostError, SiteError, StoreError, TaskbarError};
pub use events::{HostEvent, TabChange};
pub use id::{SiteId, TabId, WindowId};
pub use types::{DetachIntent, LinkBehavior, TabSnapshot, WindowSnapshot};

pub type Result<T> = std::result::Result<T, TaskbarError>;
