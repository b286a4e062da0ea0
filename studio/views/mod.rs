//! HTML fragments for the studio pages.

pub mod modals;
pub mod network;
pub mod prediction;
