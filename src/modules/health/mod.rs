pub mod controller;
pub mod router;

pub use controller::route_not_found;
pub use router::init_health_router;
