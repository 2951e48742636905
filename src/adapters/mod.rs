pub mod cli;
pub mod controllers;
pub mod renderer;
pub mod state;
