pub mod installer;

pub use installer::{JavaInstallerRunner, ModloaderRunner};
