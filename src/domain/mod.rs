pub mod stylize;
