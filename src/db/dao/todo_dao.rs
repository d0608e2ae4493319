use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::TodoItem, todo_item};

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl DaoBase for TodoDao {
    type Entity = TodoItem;

    const ENTITY_NAME: &'static str = "todo_item";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TodoDao {
    pub async fn create_item(
        &self,
        owner_id: &Uuid,
        title: &str,
        description: &str,
    ) -> DaoResult<todo_item::Model> {
        let model = todo_item::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            owner_id: Set(*owner_id),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_for_owner(&self, owner_id: &Uuid) -> DaoResult<Vec<todo_item::Model>> {
        let owner_id = *owner_id;
        self.find_all(move |query| {
            query
                .filter(todo_item::Column::OwnerId.eq(owner_id))
                .order_by_asc(todo_item::Column::Id)
        })
        .await
    }

    pub async fn list_all(&self) -> DaoResult<Vec<todo_item::Model>> {
        self.find_all(|query| query.order_by_asc(todo_item::Column::Id))
            .await
    }

    pub async fn find_for_owner(
        &self,
        id: i32,
        owner_id: &Uuid,
    ) -> DaoResult<Option<todo_item::Model>> {
        let owner_id = *owner_id;
        self.find_one(move |query| {
            query
                .filter(todo_item::Column::Id.eq(id))
                .filter(todo_item::Column::OwnerId.eq(owner_id))
        })
        .await
    }

    /// Overwrites title and description of an owned row. Returns `false` when
    /// no row matched both `id` and `owner_id`.
    pub async fn overwrite_for_owner(
        &self,
        id: i32,
        owner_id: &Uuid,
        title: &str,
        description: &str,
    ) -> DaoResult<bool> {
        let result = TodoItem::update_many()
            .col_expr(todo_item::Column::Title, Expr::value(title.to_string()))
            .col_expr(
                todo_item::Column::Description,
                Expr::value(description.to_string()),
            )
            .filter(todo_item::Column::Id.eq(id))
            .filter(todo_item::Column::OwnerId.eq(*owner_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_for_owner(&self, id: i32, owner_id: &Uuid) -> DaoResult<bool> {
        let result = TodoItem::delete_many()
            .filter(todo_item::Column::Id.eq(id))
            .filter(todo_item::Column::OwnerId.eq(*owner_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_any(&self, id: i32) -> DaoResult<bool> {
        self.delete_by_id(id).await
    }
}
