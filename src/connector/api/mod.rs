pub mod container;
pub mod controller;
pub mod handler;
pub mod http_server;
pub mod router;

pub use container::Container;
pub use handler::handle_event;
pub use router::{CommandOutput, Router};
