pub mod record;
pub mod store;

pub use record::ProfileRecord;
pub use store::{LauncherProfileRegistry, LauncherProfileStore};
