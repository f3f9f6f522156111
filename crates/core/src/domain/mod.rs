pub mod brand;
pub mod forecast;
pub mod sales;
