//! Domain entities - the core business objects.

mod category;
mod ids;
mod navigation;
mod policy;
mod post;
mod user;
mod version;

pub use category::{Category, PostCategory};
pub use ids::{parse_id, parse_optional_id};
pub(crate) use ids::supplied;
pub use navigation::{LinkSource, NavigationItem, NavigationKind, NavigationLink, NavigationTree};
pub use policy::{CascadePolicy, DeletePolicy};
pub use post::{Post, PostDetail, PostStatus, join_details};
pub use user::{Role, User, mask_email};
pub use version::PostVersion;
