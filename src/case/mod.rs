pub mod models;
pub mod session;

pub use models::{
    ConsumptionProfile, CustomerCase, InstallationProfile, InstallationType, SiteProfile,
    READING_LABELS,
};
pub use session::{CaseSession, ConsumptionDraft, InstallationDraft, SiteDraft};
