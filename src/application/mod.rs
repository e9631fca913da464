pub mod use_cases;

pub use use_cases::ingestion::{IngestionUseCase, LoadedDataset};
pub use use_cases::insights::{GenerationKind, InsightsUseCase};
pub use use_cases::session::{DashboardSession, LoadSummary};
