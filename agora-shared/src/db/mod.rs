/// Database layer: connection pooling and schema migrations

pub mod migrations;
pub mod pool;
