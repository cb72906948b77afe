pub use super::featured_items::Entity as FeaturedItems;
pub use super::movies::Entity as Movies;
pub use super::series::Entity as Series;
pub use super::settings::Entity as Settings;
pub use super::title_views::Entity as TitleViews;
pub use super::users::Entity as Users;
