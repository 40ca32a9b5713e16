//! Navigation entity for SeaORM.
//!
//! The polymorphic link is stored flat (`link_source` plus two nullable
//! references), so reading a row back into the domain type can fail.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use havamal_core::RepoError;
use havamal_core::domain::{LinkSource, NavigationItem, NavigationKind, NavigationLink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Kind {
    #[sea_orm(string_value = "internal")]
    Internal,
    #[sea_orm(string_value = "external")]
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Source {
    #[sea_orm(string_value = "custom")]
    Custom,
    #[sea_orm(string_value = "category")]
    Category,
    #[sea_orm(string_value = "post")]
    Post,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "navigation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub label: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_name = "type")]
    pub kind: Kind,
    #[sea_orm(column_name = "order")]
    pub sort_order: i32,
    /// No foreign key: deleting a parent can leave this dangling.
    pub parent_id: Option<Uuid>,
    pub link_source: Source,
    pub category_id: Option<Uuid>,
    pub post_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    Post,
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for NavigationItem {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let source = match model.link_source {
            Source::Custom => LinkSource::Custom,
            Source::Category => LinkSource::Category,
            Source::Post => LinkSource::Post,
        };
        let link = NavigationLink::from_parts(source, model.category_id, model.post_id)
            .map_err(|e| RepoError::Query(format!("navigation row {}: {}", model.id, e)))?;

        Ok(Self {
            id: model.id,
            label: model.label,
            slug: model.slug,
            kind: match model.kind {
                Kind::Internal => NavigationKind::Internal,
                Kind::External => NavigationKind::External,
            },
            sort_order: model.sort_order,
            parent_id: model.parent_id,
            link,
        })
    }
}

impl From<NavigationItem> for ActiveModel {
    fn from(item: NavigationItem) -> Self {
        let link_source = match item.link.source() {
            LinkSource::Custom => Source::Custom,
            LinkSource::Category => Source::Category,
            LinkSource::Post => Source::Post,
        };

        Self {
            id: Set(item.id),
            label: Set(item.label),
            slug: Set(item.slug),
            kind: Set(match item.kind {
                NavigationKind::Internal => Kind::Internal,
                NavigationKind::External => Kind::External,
            }),
            sort_order: Set(item.sort_order),
            parent_id: Set(item.parent_id),
            link_source: Set(link_source),
            category_id: Set(item.link.category_id()),
            post_id: Set(item.link.post_id()),
        }
    }
}
