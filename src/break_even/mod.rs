//! Break-even analysis for single products, sales mixes and subscriptions

mod types;
mod analyzer;
mod subscription;

pub use types::{
    BreakEvenResult, MultiProductBreakEven, ProductBreakEven, ProductLine, SubscriptionBreakEven,
};
pub use analyzer::{break_even, multi_product_break_even, BreakEvenAnalyzer};
pub use subscription::subscription_break_even;
