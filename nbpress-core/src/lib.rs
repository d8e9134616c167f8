#![doc = "nbpress-core: core logic library for nbpress."]

//! This crate contains the publishing pipeline for turning one Jupyter notebook into a
//! blog-ready Markdown post: path resolution, the converter boundary, asset
//! relocation and image reference rewriting.
//! Command-line parsing and config file loading live in the `nbpress` crate.
//!
//! # Usage
//! Build a [`config::PublishConfig`], pick a [`convert::Converter`] and call
//! [`publish::publish`].

pub mod config;
pub mod convert;
pub mod error;
pub mod paths;
pub mod progress;
pub mod publish;
pub mod relocate;
pub mod rewrite;
