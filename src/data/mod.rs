pub mod channel;
pub mod spline;
pub mod window;

#[cfg(feature = "gui")]
pub mod look;
