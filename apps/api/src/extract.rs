use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejection is an `AppError`, so a body that fails to
/// parse gets the same `{message, code}` envelope as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
