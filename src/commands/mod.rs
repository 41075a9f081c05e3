mod allocate;
mod info;

pub use allocate::allocate;
pub use info::info;
