//! Domain rules for the artists lab: stages, tag lists, media rules,
//! storage object paths, form validation, listing and theme preference.
//!
//! Nothing in this crate performs network I/O; the backend client lives in
//! `artlab-db` and the workflows that sequence it live in `artlab-api`.

pub mod error;
pub mod ffmpeg;
pub mod listing;
pub mod media;
pub mod naming;
pub mod stage;
pub mod tags;
pub mod theme;
pub mod types;
pub mod validation;
