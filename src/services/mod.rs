//! Application services that sit beside the view-models: transactional
//! email delivery and the admin invitation flow.

pub mod email;
pub mod invite;

pub use email::EmailService;
pub use invite::InviteService;
