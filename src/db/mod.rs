pub mod admin_repository;
pub mod hostel_repository;
pub mod schema;
pub mod user_repository;
