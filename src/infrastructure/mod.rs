pub mod compositor;
pub mod fetch;
pub mod provider;
pub mod style_refs;
