pub mod detection;
pub mod geolocation;
pub mod pipeline;
pub mod session;
pub mod shared;
pub mod snapshot;
pub mod video;
