pub mod camera;
pub mod core;
pub mod deck;
pub mod fold;
pub mod loading;
pub mod materials;
pub mod session;
pub mod systems;
