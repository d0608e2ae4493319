use std::fmt::Display;

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PrimaryKeyTrait, Select,
};

use super::error::{DaoLayerError, DaoResult};

pub type ModelOf<D> = <<D as DaoBase>::Entity as EntityTrait>::Model;
pub type ActiveModelOf<D> = <<D as DaoBase>::Entity as EntityTrait>::ActiveModel;
pub type PrimaryKeyOf<D> =
    <<<D as DaoBase>::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized {
    type Entity: EntityTrait + Send + Sync;

    /// Name used in not-found errors.
    const ENTITY_NAME: &'static str;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    async fn create(&self, active: ActiveModelOf<Self>) -> DaoResult<ModelOf<Self>>
    where
        ModelOf<Self>: IntoActiveModel<ActiveModelOf<Self>>,
        ActiveModelOf<Self>: ActiveModelTrait<Entity = Self::Entity> + Send,
    {
        active.insert(self.db()).await.map_err(DaoLayerError::Db)
    }

    async fn find_by_id<K>(&self, id: K) -> DaoResult<Option<ModelOf<Self>>>
    where
        K: Into<PrimaryKeyOf<Self>> + Send,
    {
        Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn require_by_id<K>(&self, id: K) -> DaoResult<ModelOf<Self>>
    where
        K: Into<PrimaryKeyOf<Self>> + Display + Send,
    {
        let label = id.to_string();
        self.find_by_id(id).await?.ok_or(DaoLayerError::NotFound {
            entity: Self::ENTITY_NAME,
            id: label,
        })
    }

    async fn find_one<F>(&self, apply: F) -> DaoResult<Option<ModelOf<Self>>>
    where
        F: FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    {
        apply(Self::Entity::find())
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn find_all<F>(&self, apply: F) -> DaoResult<Vec<ModelOf<Self>>>
    where
        F: FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    {
        apply(Self::Entity::find())
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Returns `false` when no row carried `id`.
    async fn delete_by_id<K>(&self, id: K) -> DaoResult<bool>
    where
        K: Into<PrimaryKeyOf<Self>> + Send,
    {
        let result = Self::Entity::delete_by_id(id)
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        Ok(result.rows_affected > 0)
    }
}
