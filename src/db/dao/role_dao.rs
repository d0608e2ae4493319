use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{
    prelude::{Role, UserRole},
    role, user_role,
};

#[derive(Clone)]
pub struct RoleDao {
    db: DatabaseConnection,
}

impl DaoBase for RoleDao {
    type Entity = Role;

    const ENTITY_NAME: &'static str = "role";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RoleDao {
    pub async fn find_by_name(&self, name: &str) -> DaoResult<Option<role::Model>> {
        let name = name.to_string();
        self.find_one(move |query| query.filter(role::Column::Name.eq(name)))
            .await
    }

    pub async fn create_role(&self, name: &str) -> DaoResult<role::Model> {
        let model = role::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn names_for_user(&self, user_id: &Uuid) -> DaoResult<Vec<String>> {
        let role_ids: Vec<Uuid> = UserRole::find()
            .filter(user_role::Column::UserId.eq(*user_id))
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)?
            .into_iter()
            .map(|membership| membership.role_id)
            .collect();

        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let roles = self
            .find_all(move |query| {
                query
                    .filter(role::Column::Id.is_in(role_ids))
                    .order_by_asc(role::Column::Name)
            })
            .await?;
        Ok(roles.into_iter().map(|role| role.name).collect())
    }

    pub async fn is_member(&self, user_id: &Uuid, role_id: &Uuid) -> DaoResult<bool> {
        let membership = UserRole::find_by_id((*user_id, *role_id))
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(membership.is_some())
    }

    pub async fn add_member(&self, user_id: &Uuid, role_id: &Uuid) -> DaoResult<()> {
        let model = user_role::ActiveModel {
            user_id: Set(*user_id),
            role_id: Set(*role_id),
            ..Default::default()
        };
        model.insert(&self.db).await.map_err(DaoLayerError::Db)?;
        Ok(())
    }
}
