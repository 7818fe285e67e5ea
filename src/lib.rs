pub mod bootstrap;
pub mod clients;
pub mod dispatcher;
pub mod inspectors;
pub mod models;
pub mod notifier;
pub mod recorder;
pub mod registry;
pub mod repository;
pub mod utils;
pub mod watcher;
