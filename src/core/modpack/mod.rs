pub mod descriptor;
pub mod validator;

pub use descriptor::ProfileTransformer;
pub use validator::{ModpackLayout, ModpackValidator};
