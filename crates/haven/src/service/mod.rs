//! Application services between the HTTP handlers and the backends.

mod admin;

pub use admin::AdminService;
