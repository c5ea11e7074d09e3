pub mod break_even;
pub mod rating;

pub use break_even::{
    compute_break_even, expected_loss, BreakEvenInput, OperationalCosts, PricingBreakdown,
    RiskProfile, SpreadComponent,
};
pub use rating::{rating_from_pd, RatingClass};
