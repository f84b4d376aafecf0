pub mod accessor;
pub mod binding;
pub mod loadable;
pub mod recent;

pub use accessor::StorageAccessor;
pub use binding::{SetValue, StorageBinding};
pub use loadable::Loadable;
pub use recent::{Favorites, RecentItems};
