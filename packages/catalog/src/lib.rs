// ABOUTME: Product catalogue and testimonial management
// ABOUTME: Provides typed records, boundary validation, and SQLite storage

pub mod products;
pub mod testimonials;
pub mod types;
pub mod validation;

// Re-export main types
pub use products::ProductStorage;
pub use testimonials::TestimonialStorage;
pub use types::{
    Product, ProductCategory, ProductFilter, ProductInput, Testimonial, TestimonialFilter,
    TestimonialInput,
};
