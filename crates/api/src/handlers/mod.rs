pub mod admin;
pub mod theme;
pub mod wall;
