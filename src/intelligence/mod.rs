//! Screening core: metric lookup, range evaluation, risk scoring and
//! per-message aggregation. Synchronous and side-effect free apart from
//! tracing; the only shared state is the swappable [`MetricStore`].

pub mod aggregator;
pub mod evaluator;
pub mod messages;
pub mod reference;
pub mod risk;
pub mod store;
pub mod types;

pub use aggregator::{
    calculate_abnormal_result, process_abnormal_results, screen_message, screen_parsed,
    ScreeningOptions,
};
pub use evaluator::{evaluate, is_eligible, parse_inline_range, InlineRange};
pub use messages::AdvisoryMessages;
pub use reference::MetricIndex;
pub use risk::{score, RiskScore};
pub use store::MetricStore;
pub use types::{Band, MetricMatch, StoreError, Verdict};
