//! Document exports

pub mod guest_list;

pub use guest_list::{export_filename, render_guest_list};
