//! Configuration module

mod site;

pub use site::CacheConfig;
pub use site::CmsConfig;
pub use site::Labels;
pub use site::LayoutConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::TOKEN_ENV;
