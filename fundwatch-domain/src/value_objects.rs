// Domain value objects
pub mod alert_code;
pub mod event_type;
pub mod identifiers;

pub use alert_code::*;
pub use event_type::*;
pub use identifiers::*;
