pub mod error;
pub mod fallback;

pub use error::PoseidonError;
pub use fallback::{
    generate_dynamic_fallback_data, DynamicFallback, FallbackData, FallbackSource, StaticFallback,
};
