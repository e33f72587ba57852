mod audit_record;
mod catalog;
mod field_value;
mod form_draft;
mod loan;
mod status;

pub use audit_record::{Actor, AuditRecord};
pub use catalog::{
    Catalog, EligibilityQuestion, KbliOption, LoanProduct, ReportingPeriod, VaultItem,
    VaultItemKind,
};
pub use field_value::{FieldValue, GeoPoint};
pub use form_draft::FormDraft;
pub use loan::{LoanQuote, LoanQuoteInput};
pub use status::{ChangeStatus, ReportStatus, StageState, TimelineStage};
