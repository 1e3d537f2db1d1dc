pub mod html;
pub mod telegram;
pub mod text;
