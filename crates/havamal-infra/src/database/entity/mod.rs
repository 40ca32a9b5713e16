//! SeaORM entities, one module per table.

pub mod category;
pub mod navigation;
pub mod post;
pub mod post_category;
pub mod post_version;
pub mod user;
