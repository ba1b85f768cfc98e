//! SeaORM entities for the mind map schema plus connection helpers.
//!
//! Every entity keeps `created_at`/`updated_at` current through its
//! `ActiveModelBehavior::before_save` hook, so callers never set them.

pub mod errors;
pub mod db;
pub mod user;
pub mod mind_map;
pub mod node;
pub mod node_connection;

#[cfg(test)]
mod tests;
