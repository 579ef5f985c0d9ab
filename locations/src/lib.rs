pub mod api;
pub mod controller;
pub mod current_location;
pub mod repository;
