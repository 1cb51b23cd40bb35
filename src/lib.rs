//! Core library for the evalnat-tools command line application.
//!
//! The library turns national evaluation exports into per-school competency
//! results. IO adapters live under [`evalnat::tools::io`], data
//! representations inside [`evalnat::tools::model`], the structural
//! extraction engine in [`evalnat::tools::extract`], the accumulated results
//! in [`evalnat::tools::registry`], and the orchestration helpers under
//! [`evalnat::tools::ingest`].

pub mod evalnat;

pub use evalnat::tools::{
    ExtractError, Result, config, error, extract, ingest, io, model, registry,
};
