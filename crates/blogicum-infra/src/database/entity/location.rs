//! Location entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for blogicum_core::domain::Location {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_published: model.is_published,
            created_at: model.created_at.into(),
        }
    }
}

impl From<blogicum_core::domain::Location> for ActiveModel {
    fn from(location: blogicum_core::domain::Location) -> Self {
        Self {
            id: Set(location.id),
            name: Set(location.name),
            is_published: Set(location.is_published),
            created_at: Set(location.created_at.into()),
        }
    }
}
