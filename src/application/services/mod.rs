pub(crate) mod stylize;
