pub mod ticket_detail;
pub mod tickets;
