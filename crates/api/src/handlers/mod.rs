pub mod articles;
pub mod projects;
pub mod series;
pub mod tags;
