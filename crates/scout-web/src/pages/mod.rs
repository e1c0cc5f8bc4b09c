//! Page Components

mod home;
mod chat;

pub use home::HomePage;
pub use chat::ChatPage;
