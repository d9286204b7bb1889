pub mod http_booking;
pub mod in_memory;
