pub mod context;
pub mod game_dir;
pub mod observer;
pub mod pipeline;
pub mod stage;

pub use context::{InstallAttempt, InstallReport};
pub use game_dir::Placement;
pub use observer::{DownloadProgress, InstallEvent, InstallObserver, NoopObserver};
pub use pipeline::InstallPipeline;
pub use stage::Stage;
