pub mod expire_sessions;
pub mod list_greetings;
pub mod session_demo;
pub mod sessions;
pub mod sign_guestbook;

#[cfg(test)]
pub(crate) mod test_support;
