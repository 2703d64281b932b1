pub mod api;
pub mod relay;

pub use api::ApiClient;
pub use relay::{DisabledRelay, RelayFrame, RelayMessage, WsRelay};
