//! HTTP handlers

pub mod extract;
pub mod health;
pub mod model;
pub mod predict;

#[cfg(test)]
mod tests;
