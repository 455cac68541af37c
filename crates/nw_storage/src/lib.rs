use std::sync::Arc;
use nw_core::{ArticleStore, Error, Result};

pub mod backends;

pub use backends::memory::MemoryStorage;
#[cfg(feature = "sqlite")]
pub use backends::sqlite::SqliteStorage;

/// Build a store backend by name. `db_path` only applies to file-backed
/// backends.
#[cfg_attr(not(feature = "sqlite"), allow(unused_variables))]
pub async fn create_store(name: &str, db_path: Option<&str>) -> Result<Arc<dyn ArticleStore>> {
    match name {
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = std::path::PathBuf::from(db_path.unwrap_or("articles.db"));
            Ok(Arc::new(SqliteStorage::new_with_path(&path).await?))
        }
        other => Err(Error::Storage(format!("Unknown storage backend: {}", other))),
    }
}

pub mod prelude {
    pub use super::backends::memory::MemoryStorage;
    pub use super::create_store;
    pub use nw_core::{Article, ArticleStore, ArticleUpdate, BulkOutcome, Result};
}
