//! Crop physiology models.
//!
//! This module contains models of carbon and nitrogen metabolism in crop
//! plants, organized around the plant's organ hierarchy.

pub mod cn_wheat;
