//! Auth token entity for SeaORM. `user_id` is unique: one token per user.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "auth_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for blog_core::domain::AuthToken {
    fn from(model: Model) -> Self {
        Self {
            key: model.key,
            user_id: model.user_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<blog_core::domain::AuthToken> for ActiveModel {
    fn from(token: blog_core::domain::AuthToken) -> Self {
        Self {
            key: Set(token.key),
            user_id: Set(token.user_id),
            created_at: Set(token.created_at.into()),
        }
    }
}
