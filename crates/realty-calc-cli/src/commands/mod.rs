pub mod amortization;
pub mod analysis;
pub mod projection;
pub mod summary;
