pub mod client;

pub use client::{ArchiveFetcher, Downloader};
