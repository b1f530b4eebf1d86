mod password;
mod session;

pub use password::{hash_password, verify_password};
pub use session::{
    create_session_token, token_from_headers, verify_session_token, SessionClaims, SessionUser,
    SESSION_COOKIE,
};
