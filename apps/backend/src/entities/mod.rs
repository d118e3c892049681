pub mod orders;
pub mod user_credentials;
pub mod users;

pub use orders::Entity as Orders;
pub use orders::Model as Order;
pub use user_credentials::Entity as UserCredentials;
pub use user_credentials::Model as UserCredential;
pub use users::Entity as Users;
pub use users::Model as User;
