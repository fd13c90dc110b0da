pub mod directory;
pub mod ledger;
pub mod registry;
pub mod seed;
pub mod ticket;

pub use ledger::AttendanceLedger;
pub use registry::EmployeeRegistry;
pub use ticket::WriteTicket;
