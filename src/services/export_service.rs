use std::{fmt::Write, sync::Arc};

use uuid::Uuid;

use crate::{
    db::entities::todo_item,
    error::AppError,
    identity::IdentityStore,
    mail::{MailError, Mailer, OutgoingMail},
    services::todo_service::TodoService,
};

pub const EXPORT_SUBJECT: &str = "Your to-do list";

/// Emails callers a plain-text rendering of their own items.
#[derive(Clone)]
pub struct ExportService {
    todos: TodoService,
    identity: Arc<dyn IdentityStore>,
    mailer: Arc<dyn Mailer>,
}

impl ExportService {
    pub fn new(
        todos: TodoService,
        identity: Arc<dyn IdentityStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            todos,
            identity,
            mailer,
        }
    }

    pub async fn send_to_caller(&self, caller_id: &Uuid) -> Result<(), AppError> {
        let user = self
            .identity
            .find_by_id(&caller_id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let Some(address) = user.email.clone() else {
            tracing::warn!(caller_id = %caller_id, "export requested without an email address");
            return Err(AppError::bad_request("User has no email address"));
        };

        let items = self.todos.list(caller_id).await?;
        let mail = OutgoingMail {
            to_name: user.user_name,
            to_address: address,
            subject: EXPORT_SUBJECT.to_string(),
            body: render_export(&items),
        };

        match self.mailer.send(mail).await {
            Ok(()) => {
                tracing::info!(caller_id = %caller_id, items = items.len(), "sent to-do export");
                Ok(())
            }
            Err(err @ MailError::NotConfigured) => {
                tracing::error!(caller_id = %caller_id, "export requested without smtp settings");
                Err(AppError::internal(err.to_string()))
            }
            Err(err) => Err(AppError::internal_with_source("Failed to send email", err)),
        }
    }
}

pub fn render_export(items: &[todo_item::Model]) -> String {
    let mut body = String::from("Your to-do list:\n");
    for item in items {
        let _ = writeln!(body, "- {}:\n{}\n", item.title, item.description);
    }
    body
}
