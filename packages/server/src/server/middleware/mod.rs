pub mod isolation;

pub use isolation::cross_origin_isolation;
