// src/gui/components/mod.rs
pub mod data_table;
pub mod report_view;
pub mod run_bar;
pub mod tabs;
