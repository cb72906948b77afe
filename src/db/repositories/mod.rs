pub mod featured;
pub mod movie;
pub mod series;
pub mod settings;
pub mod user;
pub mod views;
