/// Database models
///
/// Each model owns its CRUD operations as inherent async functions over a
/// `PgPool` (save / find / exists / delete), replacing ORM-style managed
/// entities with explicit queries.
///
/// # Models
///
/// - `user`: accounts, credentials, roles
/// - `board`: board posts
/// - `comment`: comments on board posts
/// - `report`: reports filed against boards and comments

pub mod board;
pub mod comment;
pub mod report;
pub mod user;
