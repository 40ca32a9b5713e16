//! Post/category join table for SeaORM. The composite key enforces pair uniqueness.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use havamal_core::domain::PostCategory;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub post_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub category_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PostCategory {
    fn from(model: Model) -> Self {
        PostCategory::new(model.post_id, model.category_id)
    }
}

impl From<PostCategory> for ActiveModel {
    fn from(link: PostCategory) -> Self {
        Self {
            post_id: Set(link.post_id),
            category_id: Set(link.category_id),
        }
    }
}
