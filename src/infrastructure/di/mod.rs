// src/infrastructure/di/mod.rs

pub mod service_container;

pub use service_container::ServiceContainer;
