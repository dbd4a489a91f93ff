mod models;
mod namespace;

pub use models::*;
pub use namespace::{
    MISC_NAMESPACE, NAMESPACE_PRIORITY, ROWS_NAMESPACE, namespace_rank,
};
