//! Grid layout and category-transition engine for a start-page dashboard.
//!
//! The engine is split leaf-first: [`layout`] classifies the viewport and resolves tile
//! spans, [`store`] and [`board`] keep each category's tiles durable, [`reorder`] and
//! [`transition`] are the two input-driven state machines, and [`grid`] wires them to the
//! [`settings`] bridge for a host to drive.

pub mod board;
pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod model;
pub mod reorder;
pub mod seed;
pub mod settings;
pub mod store;
pub mod transition;

pub use error::{BoardError, ReorderError, StoreError};
pub use grid::GridEngine;
pub use model::{Category, GridItem, IconSettings, ItemKind, OpenMethod, SidebarSettings};
