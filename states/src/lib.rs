//! Generic resource-store machinery: pagination, entity hooks, and the
//! parametric CRUD store every admin resource instantiates.

mod error;
mod paginate;
mod resource;
mod store;

pub use error::{FormError, StoreError};
pub use paginate::{DEFAULT_PER_PAGE, PageQuery, PaginatedView, filter_records, paginate};
pub use resource::Resource;
pub use store::{DialogMode, ResourceStore};
