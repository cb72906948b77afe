pub mod prelude;

pub mod featured_items;
pub mod movies;
pub mod series;
pub mod settings;
pub mod title_views;
pub mod users;
