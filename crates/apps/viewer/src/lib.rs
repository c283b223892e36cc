pub mod config;
pub mod globe_controller;
pub mod interaction;
pub mod surface;
pub mod svg;
pub mod viewer;
