pub mod current_user;
pub mod owned;
pub mod role_guard;
pub mod validated_json;

pub use current_user::CurrentUser;
pub use owned::{Owned, OwnedResource};
pub use role_guard::{AdminOnly, AdminUser, RoleGuarded, RoleSpec};
pub use validated_json::ValidatedJson;
