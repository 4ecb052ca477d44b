pub mod extraction;
pub mod pricing;
