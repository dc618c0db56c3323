pub mod dataset_service;
pub mod death_statistics_service;
pub mod record_query_service;
pub mod summary_service;

pub use dataset_service::{load_dataset, Dataset, DatasetCache};
pub use death_statistics_service::{DeathCounter, DeathStatistics, YearStatistics};
pub use record_query_service::{LifeStatus, NobilityStatus, RecordFilter, RecordQueryResult};
pub use summary_service::{summarize, DatasetSummary};
