pub mod formatter;

pub use formatter::{format_listing, format_menu, print_failures};
