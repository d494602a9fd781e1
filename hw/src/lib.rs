#![allow(clippy::new_without_default, clippy::derive_partial_eq_without_eq)]

pub mod alphabet;
pub mod canvas;
pub mod config;
pub mod dataset;
pub mod error;
pub mod i18n;
pub mod session;
pub mod store;
pub mod stroke;

pub use crate::{
    canvas::{Canvas, StylusEvent, Tool},
    config::Config,
    dataset::{Dataset, Label, LabelStatus},
    error::{ErrorKind, HwError, HwErrorExt},
    session::Session,
    store::DatasetStore,
    stroke::{Drawing, Stroke, StrokeElement},
};
