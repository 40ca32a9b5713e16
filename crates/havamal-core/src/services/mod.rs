//! Services - the managers that hold the cross-entity rules.
//! Each one talks only to the ports, never to a concrete store.

mod category_service;
mod identity;
mod navigation_service;
mod post_service;
mod user_service;
mod version_service;

pub use category_service::{CategoryInput, CategoryService};
pub use identity::IdentityResolver;
pub use navigation_service::{NavigationInput, NavigationService};
pub use post_service::{CategoryAttachment, CreatedPost, NewPost, PostChanges, PostService};
pub use user_service::{UserInput, UserService};
pub use version_service::{VersionInput, VersionService};
