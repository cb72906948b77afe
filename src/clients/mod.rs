pub mod omdb;
pub mod tmdb;
