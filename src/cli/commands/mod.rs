pub mod cache;
pub mod common;
mod collection;
mod config;
mod icon;
mod list;
mod show;

pub use self::collection::collection;
pub use self::config::config;
pub use self::icon::icon;
pub use self::list::list;
pub use self::show::show;
