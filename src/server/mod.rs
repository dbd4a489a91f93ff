pub mod dto;
mod messages;
pub mod response;
mod router;
mod status;
mod tags;

pub use router::{api_router, create_router};
