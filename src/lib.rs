//! Interactive dashboard over the SNIC provincial crime statistics.
//!
//! The [`data`] layer loads and validates the dataset and implements the
//! filter and aggregation pipeline; [`view::render`] turns a filter selection
//! into the model drawn by the egui front end in [`app`] and [`ui`].

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
pub mod view;
