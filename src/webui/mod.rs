//! Web interface for userbase
//!
//! Server-rendered HTML pages: registration and login forms, the pre-filled
//! edit form, and the paginated user list.

pub mod pages;

pub use pages::{edit_page, login_page, register_page, users_page};
