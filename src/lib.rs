//! This is a library for validating the input fields of a form as the
//! user types.
//!
//! Each field is represented by a [ValidationModel](ValidationModel),
//! which holds the field's value, checks it against a
//! [RuleSet](RuleSet) whenever it changes, and notifies its
//! listeners with a [ValidationEvent](ValidationEvent). A
//! [FieldBinding](FieldBinding) connects a model to an element
//! implementing [FieldElement](FieldElement): input is forwarded to
//! the model, and the model's events toggle the element's error class
//! and error messages.
//!
//! Typically to use this library, you would call
//! [bind_all()](bind_all()) with the input elements of a page, and
//! keep the returned bindings alive.
//!
//! ## Optional Features
//!
//! + `"wasm-bindgen-support"` - enable the [web](web) module, binding
//!   [web-sys](https://crates.io/crates/web-sys) input elements on the
//!   `wasm32-unknown-unknown` platform.
//! + `"serde-support"` - enable serialization of rules and field
//!   configuration with [serde](https://crates.io/crates/serde).

#![cfg_attr(docsrs, feature(doc_cfg))]

mod binding;
mod config;
mod dom;
mod emitter;
mod error;
mod event;
mod model;
mod rule;

#[cfg(feature = "wasm-bindgen-support")]
#[cfg_attr(docsrs, doc(cfg(feature = "wasm-bindgen-support")))]
pub mod web;

pub use binding::*;
pub use config::*;
pub use dom::*;
pub use emitter::*;
pub use error::*;
pub use event::*;
pub use model::*;
pub use rule::*;
