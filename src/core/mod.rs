// ─── Modpack Installer Core ───
// Install pipeline for one-click modpack installs into the Minecraft launcher.
//
// Architecture:
//   core/
//     paths        Platform layout (staging, launcher, game roots)
//     settings     User overrides loaded from disk
//     staging      Scratch directory lifecycle
//     link         Download link shape check
//     downloader/  Streaming archive download with progress
//     archive      Zip extraction
//     modpack/     Extracted tree validation + profile descriptor
//     profiles/    Launcher profile records + registry file
//     java/        Java runtime lookup for the installer jar
//     loaders/     Mod-loader installer subprocess
//     install/     Stage machine, attempt context, rollback

pub mod archive;
pub mod downloader;
pub mod error;
pub mod http;
pub mod install;
pub mod java;
pub mod link;
pub mod loaders;
pub mod modpack;
pub mod paths;
pub mod profiles;
pub mod settings;
pub mod staging;
