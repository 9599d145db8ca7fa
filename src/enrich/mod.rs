mod checks;
mod fetch;
mod orchestrator;

pub use checks::CheckSummary;
pub use fetch::enrich_pull;
pub use orchestrator::{EnrichOptions, Enricher, EnrichmentStatus, PrStatus, RunReport};
