//! Core types and trait definitions for the cultural studies catalogue.
//!
//! Fuzzy dates, select lists, finding aids, records, relationships, history
//! and the admin view tables live here, along with the [`store::CatalogueStore`] seam that
//! storage backends implement. Nothing here touches HTTP or SQL.

#![allow(async_fn_in_trait)]

pub mod error;
pub mod finding_aid;
pub mod fuzzy_date;
pub mod history;
pub mod record;
pub mod relationship;
pub mod select_list;
pub mod store;
pub mod validate;
pub mod view;

pub use error::{Error, Result};
