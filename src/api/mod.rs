pub mod alerts;
pub mod dashboard;
pub mod data;
pub mod decisions;
pub mod export;
pub mod middleware;
