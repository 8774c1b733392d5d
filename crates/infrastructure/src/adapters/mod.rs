//! Port adapters backed by external crates.

mod reqwest_transport;
mod session_persistence;

pub use reqwest_transport::ReqwestTransport;
pub use session_persistence::{
    HttpSessionClient, log_in, restore_refresh_cookie, save_refresh_cookie,
};
