pub mod admin;
pub mod hostel;
pub mod response;
pub mod user;
