pub mod chat;
pub mod list;
pub mod lookup;

pub use chat::handle_chat;
pub use list::handle_list;
pub use lookup::handle_lookup;
