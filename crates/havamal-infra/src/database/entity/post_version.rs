//! Post version entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post_versions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub version: String,
    pub post_id: Uuid,
    pub version_number: i32,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for havamal_core::domain::PostVersion {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            version: model.version,
            post_id: model.post_id,
            version_number: model.version_number,
            content: model.content,
            created_at: model.created_at.into(),
        }
    }
}

impl From<havamal_core::domain::PostVersion> for ActiveModel {
    fn from(version: havamal_core::domain::PostVersion) -> Self {
        Self {
            id: Set(version.id),
            version: Set(version.version),
            post_id: Set(version.post_id),
            version_number: Set(version.version_number),
            content: Set(version.content),
            created_at: Set(version.created_at.into()),
        }
    }
}
