//! Value Objects - Immutable, identity-less domain primitives

mod email_address;
mod sidebar_status;
mod start_page;
mod theme;
mod timezone;
mod user_id;

pub use email_address::EmailAddress;
pub use sidebar_status::SidebarStatus;
pub use start_page::StartPage;
pub use theme::Theme;
pub use timezone::Timezone;
pub use user_id::UserId;
