//! Machine-readable error codes.
//!
//! Every error body carries one of these codes. Handlers never pass ad-hoc
//! strings; new codes are added here so clients can rely on the set being
//! closed. The wire form is SCREAMING_SNAKE_CASE.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication and role checks
    Unauthorized,
    UnauthorizedMissingBearer,
    UnauthorizedInvalidJwt,
    UnauthorizedExpiredJwt,
    Forbidden,
    /// The token was valid but its subject has no user record.
    ForbiddenUserNotFound,
    InsufficientRole,
    NotResourceOwner,

    // Input validation
    InvalidOrderId,
    InvalidOrderNumber,
    InvalidCustomerId,
    InvalidEmail,
    InvalidAuthSub,
    InvalidOrderStatus,
    InvalidRole,
    ValidationError,
    BadRequest,

    // Missing resources
    OrderNotFound,
    CustomerNotFound,
    UserNotFound,
    NotFound,

    // Conflicts
    /// The email exists but is bound to a different auth subject.
    AuthSubMismatch,
    UniqueEmail,
    Conflict,

    // Database and system
    DbError,
    DbUnavailable,
    DbTimeout,
    Internal,
    ConfigError,
    /// A stored value failed to parse back into its domain type.
    DataCorruption,
}

impl ErrorCode {
    /// Every code the API can emit, used by the uniqueness check below.
    pub const ALL: &'static [ErrorCode] = &[
        Self::Unauthorized,
        Self::UnauthorizedMissingBearer,
        Self::UnauthorizedInvalidJwt,
        Self::UnauthorizedExpiredJwt,
        Self::Forbidden,
        Self::ForbiddenUserNotFound,
        Self::InsufficientRole,
        Self::NotResourceOwner,
        Self::InvalidOrderId,
        Self::InvalidOrderNumber,
        Self::InvalidCustomerId,
        Self::InvalidEmail,
        Self::InvalidAuthSub,
        Self::InvalidOrderStatus,
        Self::InvalidRole,
        Self::ValidationError,
        Self::BadRequest,
        Self::OrderNotFound,
        Self::CustomerNotFound,
        Self::UserNotFound,
        Self::NotFound,
        Self::AuthSubMismatch,
        Self::UniqueEmail,
        Self::Conflict,
        Self::DbError,
        Self::DbUnavailable,
        Self::DbTimeout,
        Self::Internal,
        Self::ConfigError,
        Self::DataCorruption,
    ];

    /// The exact string that appears in HTTP responses.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::Forbidden => "FORBIDDEN",
            Self::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",
            Self::NotResourceOwner => "NOT_RESOURCE_OWNER",
            Self::InvalidOrderId => "INVALID_ORDER_ID",
            Self::InvalidOrderNumber => "INVALID_ORDER_NUMBER",
            Self::InvalidCustomerId => "INVALID_CUSTOMER_ID",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidAuthSub => "INVALID_AUTH_SUB",
            Self::InvalidOrderStatus => "INVALID_ORDER_STATUS",
            Self::InvalidRole => "INVALID_ROLE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::CustomerNotFound => "CUSTOMER_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::AuthSubMismatch => "AUTH_SUB_MISMATCH",
            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::Conflict => "CONFLICT",
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
