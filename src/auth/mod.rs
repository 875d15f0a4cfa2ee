//! 登录校验、锁定计数和凭据维护

pub mod credentials;
pub mod login;
pub mod password;

pub use credentials::{CredentialError, DeleteSummary};
pub use login::{AuthError, authenticate};
pub use password::{SaltScheme, hash_password, verify_password};
