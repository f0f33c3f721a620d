pub(crate) mod network;

pub use network::{CollectError, StatsProvider, SystemStatProvider};
