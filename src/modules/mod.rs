pub mod action;
pub mod agent;
pub mod config;
pub mod engine;
pub mod grid;
pub mod policy;
pub mod resource;
pub mod rules;
pub mod save;
pub mod state;
pub mod stats;
pub mod structure;
pub mod view;
