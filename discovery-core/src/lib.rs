pub const DISCOVERY_CONFIG: &'static str = include_str!("../discovery.toml");

pub mod config;
pub mod discovery;
pub mod error;
pub mod ext;
pub mod member;
pub mod membership_cache;
pub mod membership_snapshot;
pub mod scanner;
pub mod service;
pub mod settings;
pub mod transport;
pub mod util;

#[cfg(test)]
mod test {
    use tracing::Level;

    use crate::ext::init_logger;

    #[ctor::ctor]
    fn init() {
        init_logger(Level::DEBUG)
    }
}
