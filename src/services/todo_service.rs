use uuid::Uuid;

use crate::{
    db::dao::TodoDao,
    db::entities::todo_item::{self, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS},
    error::AppError,
};

/// Client-supplied fields of a to-do item, before ownership is applied.
#[derive(Debug, Clone, Default)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
}

/// Full replacement of an existing item as sent on update.
#[derive(Debug, Clone)]
pub struct TodoReplacement {
    pub id: i32,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
}

impl TodoService {
    pub fn new(todo_dao: TodoDao) -> Self {
        Self { todo_dao }
    }

    pub async fn list(&self, caller_id: &Uuid) -> Result<Vec<todo_item::Model>, AppError> {
        let items = self.todo_dao.list_for_owner(caller_id).await?;
        tracing::info!(caller_id = %caller_id, items = items.len(), "listed to-do items");
        Ok(items)
    }

    pub async fn get(&self, caller_id: &Uuid, id: i32) -> Result<todo_item::Model, AppError> {
        self.todo_dao
            .find_for_owner(id, caller_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(caller_id = %caller_id, item_id = id, "to-do item not found or not owned");
                not_found(id)
            })
    }

    pub async fn create(
        &self,
        caller_id: &Uuid,
        draft: TodoDraft,
    ) -> Result<todo_item::Model, AppError> {
        let (title, description) = validate_fields(&draft.title, draft.description.as_deref())
            .inspect_err(|err| {
                tracing::warn!(caller_id = %caller_id, error = %err.message(), "rejected new to-do item");
            })?;
        let item = self
            .todo_dao
            .create_item(caller_id, &title, &description)
            .await?;
        tracing::info!(caller_id = %caller_id, item_id = item.id, "created to-do item");
        Ok(item)
    }

    pub async fn update(
        &self,
        caller_id: &Uuid,
        id: i32,
        replacement: TodoReplacement,
    ) -> Result<(), AppError> {
        if replacement.id != id {
            tracing::warn!(caller_id = %caller_id, item_id = id, body_id = replacement.id, "update id mismatch");
            return Err(AppError::bad_request("Item id does not match the request path"));
        }
        if !owned_by(&replacement.owner_id, caller_id) {
            tracing::warn!(caller_id = %caller_id, item_id = id, "update owner mismatch");
            return Err(AppError::bad_request("Item owner does not match the caller"));
        }
        let (title, description) =
            validate_fields(&replacement.title, replacement.description.as_deref()).inspect_err(
                |err| {
                    tracing::warn!(caller_id = %caller_id, item_id = id, error = %err.message(), "rejected to-do update");
                },
            )?;

        let updated = self
            .todo_dao
            .overwrite_for_owner(id, caller_id, &title, &description)
            .await?;
        if updated {
            tracing::info!(caller_id = %caller_id, item_id = id, "updated to-do item");
            return Ok(());
        }

        match self.todo_dao.find_for_owner(id, caller_id).await? {
            None => {
                tracing::warn!(caller_id = %caller_id, item_id = id, "update target not found or not owned");
                Err(not_found(id))
            }
            Some(_) => {
                tracing::warn!(caller_id = %caller_id, item_id = id, "update lost a concurrent write");
                Err(AppError::conflict("Concurrent modification of the to-do item"))
            }
        }
    }

    pub async fn delete(&self, caller_id: &Uuid, id: i32) -> Result<(), AppError> {
        if !self.todo_dao.delete_for_owner(id, caller_id).await? {
            tracing::warn!(caller_id = %caller_id, item_id = id, "delete target not found or not owned");
            return Err(not_found(id));
        }
        tracing::info!(caller_id = %caller_id, item_id = id, "deleted to-do item");
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<todo_item::Model>, AppError> {
        Ok(self.todo_dao.list_all().await?)
    }

    pub async fn delete_any(&self, id: i32) -> Result<(), AppError> {
        if !self.todo_dao.delete_any(id).await? {
            tracing::warn!(item_id = id, "admin delete target not found");
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: i32) -> AppError {
    AppError::not_found(format!("To-do item {id} not found"))
}

fn owned_by(raw_owner: &str, caller_id: &Uuid) -> bool {
    Uuid::parse_str(raw_owner.trim()).is_ok_and(|owner| owner == *caller_id)
}

fn validate_fields(title: &str, description: Option<&str>) -> Result<(String, String), AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::bad_request(format!(
            "Title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }

    let description = description.unwrap_or_default();
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(AppError::bad_request(format!(
            "Description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok((title.to_string(), description.to_string()))
}
