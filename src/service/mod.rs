pub mod brand;
pub mod catalog;
pub mod keywords;
pub mod normalizer;
pub mod pairing;
pub mod registry;
pub mod role;
pub mod session;

pub use brand::shops_are_same_brand;
pub use catalog::{guess_category_group, match_brand, match_category, scan_missing};
pub use keywords::extract_keywords;
pub use normalizer::{core_name, display_name};
pub use pairing::{auto_match, manual_pair, score_pair, set_role, unpair, PAIR_THRESHOLD};
pub use registry::SessionRegistry;
pub use role::detect_payment_role;
pub use session::{CommitOutcome, ImportSession};
