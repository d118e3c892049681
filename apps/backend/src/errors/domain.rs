//! Error type for the service and adapter layers.
//!
//! Repos and adapters know nothing about HTTP; they fail with a
//! [`DomainError`] and the `From<DomainError> for AppError` impl in
//! `crate::error` decides status codes and wire codes at the boundary.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Which entity a lookup failed to find.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    User,
    Customer,
    Order,
    Other(String),
}

/// What state the request collided with.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// Email already taken by another account.
    UniqueEmail,
    /// Email exists but is linked to a different sign-in identity.
    AuthSubMismatch,
    Other(String),
}

/// Operational failure classes that map to distinct wire codes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    DataCorruption,
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Rejected input or violated business rule.
    Validation(String),
    Conflict(ConflictKind, String),
    NotFound(NotFoundKind, String),
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }

    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(detail) => write!(f, "validation: {detail}"),
            DomainError::Conflict(kind, detail) => write!(f, "conflict ({kind:?}): {detail}"),
            DomainError::NotFound(kind, detail) => write!(f, "missing {kind:?}: {detail}"),
            DomainError::Infra(kind, detail) => write!(f, "infra ({kind:?}): {detail}"),
        }
    }
}

impl Error for DomainError {}
