//! DTOs for users_sea adapter.

use time::OffsetDateTime;

use crate::domain::paging::SortDir;

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub sub: String,
    pub name: String,
    pub roles: Vec<String>,
}

impl UserCreate {
    pub fn new(sub: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            name: name.into(),
            roles: vec!["customer".to_string()],
        }
    }

}

/// DTO for creating new user credentials.
#[derive(Debug, Clone)]
pub struct CredentialsCreate {
    pub user_id: i64,
    pub email: String,
}

impl CredentialsCreate {
    pub fn new(user_id: i64, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}

/// DTO for a partial update of a user's own profile.
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl UserProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }
}

/// DTO for an admin-side partial update of a customer record.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub roles: Option<Vec<String>>,
}

impl CustomerUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.roles.is_none()
    }
}

/// Sortable columns of the customer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerSortField {
    #[default]
    CreatedAt,
    Name,
    Email,
}

/// Filter for the admin customer list. `page` is 1-based.
#[derive(Debug, Clone)]
pub struct CustomerListFilter {
    pub page: u64,
    pub limit: u64,
    pub sort_field: CustomerSortField,
    pub sort_order: SortDir,
    pub search: Option<String>,
    pub registered_from: Option<OffsetDateTime>,
    pub registered_to: Option<OffsetDateTime>,
}

impl Default for CustomerListFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort_field: CustomerSortField::default(),
            sort_order: SortDir::default(),
            search: None,
            registered_from: None,
            registered_to: None,
        }
    }
}
