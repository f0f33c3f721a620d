pub(crate) mod network;

pub use network::{raw_to_display, DisplayState, RawStatsSample};
