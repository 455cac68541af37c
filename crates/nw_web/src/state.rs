use std::sync::Arc;
use nw_core::ArticleStore;

pub struct AppState {
    pub store: Arc<dyn ArticleStore>,
}
