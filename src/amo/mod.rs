mod client;
pub mod icon;
pub mod mapper;
pub mod types;

pub use client::{collection_url, AmoClient, FetchOptions, API_VERSION, DEFAULT_READ_TIMEOUT};
pub use icon::{Icon, ImageFormat};
pub use mapper::map_page;
pub use types::*;
