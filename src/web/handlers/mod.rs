pub mod hunt_handlers;
pub mod resume_handlers;
pub mod system_handlers;

pub use hunt_handlers::*;
pub use resume_handlers::*;
pub use system_handlers::*;
