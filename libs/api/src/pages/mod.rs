//! Server-rendered pages. Every action handler follows the same shape:
//! update the session, call at most one service, leave a notice, then
//! redirect back to the page.

pub mod home;
pub mod layout;
pub mod recommend;
pub mod try_on;
pub mod wardrobe;
