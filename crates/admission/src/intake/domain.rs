use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{ExamDateId, FacultyId, Program};

/// Identifier wrapper for submitted applications, assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ApplicationId(pub u64);

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// English certificate kinds the intake form accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnglishCertType {
    #[serde(rename = "IELTS")]
    Ielts,
    #[serde(rename = "TOEFL")]
    Toefl,
    #[serde(rename = "CAMBRIDGE")]
    Cambridge,
}

/// Certificate sub-record, present only when the applicant declared one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnglishCertificate {
    pub cert_type: EnglishCertType,
    pub score: u16,
}

/// Payment state ledger. Transitions are monotonic except for the retry
/// edge: `pending → processing → paid | failed`, and `failed → processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }

    pub const fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Processing)
                | (PaymentStatus::Processing, PaymentStatus::Paid)
                | (PaymentStatus::Processing, PaymentStatus::Failed)
                | (PaymentStatus::Failed, PaymentStatus::Processing)
        )
    }
}

/// Kinds of uploaded proof tracked against an application. The files
/// themselves live in external storage; only opaque keys are kept here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Passport,
    Photo,
    EnglishCert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub kind: DocumentKind,
    pub storage_key: String,
}

/// Inbound public-form submission. The certificate fields mirror the form's
/// flattened shape and are validated into [`EnglishCertificate`] at intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub gender: Gender,
    pub phone: String,
    pub school: String,
    pub program_degree: Program,
    pub faculty_id: FacultyId,
    pub exam_date_id: ExamDateId,
    pub has_english_cert: bool,
    #[serde(default)]
    pub english_cert_type: Option<EnglishCertType>,
    #[serde(default)]
    pub cert_score: Option<u16>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    pub terms_accepted: bool,
}

/// A stored application: one applicant bound to exactly one
/// (faculty, exam date) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub gender: Gender,
    pub phone: String,
    pub school: String,
    pub program: Program,
    pub faculty_id: FacultyId,
    pub exam_date_id: ExamDateId,
    pub english_certificate: Option<EnglishCertificate>,
    pub documents: Vec<DocumentRef>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Administrator update payload: reassignment and/or a payment transition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUpdateRequest {
    #[serde(default)]
    pub faculty_id: Option<FacultyId>,
    #[serde(default)]
    pub exam_date_id: Option<ExamDateId>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}
