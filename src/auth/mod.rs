//! Authentication and session management

pub mod authz;
pub mod models;
pub mod password;
pub mod session;
pub mod token;

pub use authz::{capabilities_for, has_capability, require_admin, Capability};
pub use models::{AuthenticatedUser, Role, Session, SessionState, User};
pub use password::{hash_password, verify_password};
pub use session::SessionManager;
pub use token::{Claims, TokenCodec};
