/// HTTP route handlers
///
/// Handlers return `ApiResult<T>`; every success payload is wrapped in the
/// response envelope, and errors render centrally through `ApiError`.

pub mod boards;
pub mod comments;
pub mod health;
pub mod reports;
pub mod users;
