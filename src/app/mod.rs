pub mod controller;

pub use controller::{AppController, GeoipUpdate, ResourceManager};
