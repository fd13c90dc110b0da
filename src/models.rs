use serde::{Deserialize, Serialize};

/// Claims of an anonymous admin session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Session id, fresh per sign-in.
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Anonymous,
}
