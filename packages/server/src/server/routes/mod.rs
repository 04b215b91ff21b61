pub mod health;
pub mod letters;

pub use health::health_handler;
pub use letters::{get_letter_handler, mark_mailed_handler};
