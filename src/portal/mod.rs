pub mod client;
pub mod dates;
pub mod parser;
pub mod types;

pub use client::{PortalClient, Session};
pub use dates::to_iso;
pub use parser::{parse_tanks, parse_tanks_with_warnings, ParseOutcome};
pub use types::{Credentials, Snapshot, TankRecord};
