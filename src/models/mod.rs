pub mod candidate;
pub mod catalog;
pub mod order;
pub mod purchase;

pub use candidate::{CandidateItem, ItemPatch, PaymentRole};
pub use catalog::{Brand, Catalog, Category, CategoryGroup, MissingDataItem, MissingDataType};
pub use order::{parse_order_time, RawOrderItem};
pub use purchase::{ImportSummary, PriceType, PurchaseRecord};
