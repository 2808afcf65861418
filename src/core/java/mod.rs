pub mod runtime;

pub use runtime::{java_exe, JavaRuntime, RuntimeLocator};
