//! Core domain types for Recruta.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for candidates.
pub type CandidateId = i64;

/// Identifier for clients.
pub type ClientId = i64;

/// Identifier for job openings.
pub type JobId = i64;

/// Identifier for assessments (pareceres).
pub type AssessmentId = i64;

/// Identifier for access grants.
pub type AccessGrantId = i64;

/// Identifier for financial records.
pub type FinancialRecordId = i64;

/// Storage format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Systems an access grant may refer to.
pub const ACCESS_SYSTEMS: &[&str] = &[
    "SAP",
    "TOTVS",
    "Salesforce",
    "Microsoft 365",
    "Google Workspace",
    "Slack",
    "Jira",
    "GitHub",
    "VPN",
    "ERP interno",
    "Outro",
];

/// Today's date in the local calendar.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Look up a system in [`ACCESS_SYSTEMS`], ignoring case.
pub fn catalog_system(name: &str) -> Option<&'static str> {
    ACCESS_SYSTEMS
        .iter()
        .find(|s| s.eq_ignore_ascii_case(name.trim()))
        .copied()
}

/// Step of the hiring process a candidate is at for a given job.
///
/// Any stage may follow any other; real recruiting flows are not linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    #[default]
    InReview,
    Screening,
    Interview,
    Finalist,
    Dropped,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::InReview,
        PipelineStage::Screening,
        PipelineStage::Interview,
        PipelineStage::Finalist,
        PipelineStage::Dropped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::InReview => "in_review",
            PipelineStage::Screening => "screening",
            PipelineStage::Interview => "interview",
            PipelineStage::Finalist => "finalist",
            PipelineStage::Dropped => "dropped",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "in_review" => Some(PipelineStage::InReview),
            "screening" => Some(PipelineStage::Screening),
            "interview" => Some(PipelineStage::Interview),
            "finalist" => Some(PipelineStage::Finalist),
            "dropped" => Some(PipelineStage::Dropped),
            _ => None,
        }
    }

    /// Label shown to recruiters.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::InReview => "Em análise",
            PipelineStage::Screening => "Triagem",
            PipelineStage::Interview => "Entrevista",
            PipelineStage::Finalist => "Finalista",
            PipelineStage::Dropped => "Desistente/Eliminado",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Disposition of a candidate for a job, independent of the pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HiringOutcome {
    #[default]
    Pending,
    Hired,
    Rejected,
    Withdrew,
}

impl HiringOutcome {
    pub const ALL: [HiringOutcome; 4] = [
        HiringOutcome::Pending,
        HiringOutcome::Hired,
        HiringOutcome::Rejected,
        HiringOutcome::Withdrew,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HiringOutcome::Pending => "pending",
            HiringOutcome::Hired => "hired",
            HiringOutcome::Rejected => "rejected",
            HiringOutcome::Withdrew => "withdrew",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(HiringOutcome::Pending),
            "hired" | "approved" => Some(HiringOutcome::Hired),
            "rejected" => Some(HiringOutcome::Rejected),
            "withdrew" => Some(HiringOutcome::Withdrew),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HiringOutcome::Pending => "Pendente",
            HiringOutcome::Hired => "Aprovado/Contratado",
            HiringOutcome::Rejected => "Reprovado",
            HiringOutcome::Withdrew => "Desistiu",
        }
    }
}

impl std::fmt::Display for HiringOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a job opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Open,
    InProgress,
    Closed,
    Recovered,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::InProgress => "in_progress",
            JobStatus::Closed => "closed",
            JobStatus::Recovered => "recovered",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Some(JobStatus::Open),
            "in_progress" => Some(JobStatus::InProgress),
            "closed" => Some(JobStatus::Closed),
            "recovered" => Some(JobStatus::Recovered),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an assessment record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Pdf,
    Docx,
    Manual,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Pdf => "pdf",
            SourceFormat::Docx => "docx",
            SourceFormat::Manual => "manual",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Some(SourceFormat::Pdf),
            "docx" => Some(SourceFormat::Docx),
            "manual" => Some(SourceFormat::Manual),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate in the talent pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Assigned by the store on insert.
    pub id: CandidateId,
    pub name: String,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub desired_role: Option<String>,
    pub salary_expectation: Option<String>,
    pub registered_on: NaiveDate,
    pub resume_path: Option<String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            age: None,
            city: None,
            phone: None,
            email: None,
            linkedin_url: None,
            desired_role: None,
            salary_expectation: None,
            registered_on: today(),
            resume_path: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }
}

/// Field diff for editing a candidate. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct CandidateUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub desired_role: Option<String>,
    pub salary_expectation: Option<String>,
    pub resume_path: Option<String>,
}

impl CandidateUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.city.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.linkedin_url.is_none()
            && self.desired_role.is_none()
            && self.salary_expectation.is_none()
            && self.resume_path.is_none()
    }

    pub fn apply(&self, candidate: &mut Candidate) {
        if let Some(ref name) = self.name {
            candidate.name = name.clone();
        }
        if self.age.is_some() {
            candidate.age = self.age;
        }
        set_if_some(&mut candidate.city, &self.city);
        set_if_some(&mut candidate.phone, &self.phone);
        set_if_some(&mut candidate.email, &self.email);
        set_if_some(&mut candidate.linkedin_url, &self.linkedin_url);
        set_if_some(&mut candidate.desired_role, &self.desired_role);
        set_if_some(&mut candidate.salary_expectation, &self.salary_expectation);
        set_if_some(&mut candidate.resume_path, &self.resume_path);
    }
}

/// A client company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub legal_name: Option<String>,
    pub tax_id: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            legal_name: None,
            tax_id: None,
            city: None,
            contact: None,
            phone: None,
            email: None,
            notes: None,
        }
    }
}

/// Field diff for editing a client.
#[derive(Debug, Clone, Default)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub legal_name: Option<String>,
    pub tax_id: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl ClientUpdate {
    pub fn apply(&self, client: &mut Client) {
        if let Some(ref name) = self.name {
            client.name = name.clone();
        }
        set_if_some(&mut client.legal_name, &self.legal_name);
        set_if_some(&mut client.tax_id, &self.tax_id);
        set_if_some(&mut client.city, &self.city);
        set_if_some(&mut client.contact, &self.contact);
        set_if_some(&mut client.phone, &self.phone);
        set_if_some(&mut client.email, &self.email);
        set_if_some(&mut client.notes, &self.notes);
    }
}

/// A job opening (vaga), optionally owned by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub client_id: Option<ClientId>,
    pub title: String,
    pub modality: Option<String>,
    pub opened_on: Option<NaiveDate>,
    pub closed_on: Option<NaiveDate>,
    pub status: JobStatus,
    pub description: Option<String>,
}

impl Job {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            client_id: None,
            title: title.into(),
            modality: None,
            opened_on: Some(today()),
            closed_on: None,
            status: JobStatus::Open,
            description: None,
        }
    }

    pub fn with_client(mut self, client_id: Option<ClientId>) -> Self {
        self.client_id = client_id;
        self
    }

    /// Change the status, stamping the close date when the job closes.
    pub fn set_status(&mut self, status: JobStatus) {
        self.status = status;
        match status {
            JobStatus::Closed => {
                if self.closed_on.is_none() {
                    self.closed_on = Some(today());
                }
            }
            _ => self.closed_on = None,
        }
    }
}

/// Field diff for editing a job.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub client_id: Option<ClientId>,
    pub title: Option<String>,
    pub modality: Option<String>,
    pub description: Option<String>,
    pub opened_on: Option<NaiveDate>,
    pub closed_on: Option<NaiveDate>,
}

impl JobUpdate {
    pub fn apply(&self, job: &mut Job) {
        if self.client_id.is_some() {
            job.client_id = self.client_id;
        }
        if let Some(ref title) = self.title {
            job.title = title.clone();
        }
        set_if_some(&mut job.modality, &self.modality);
        set_if_some(&mut job.description, &self.description);
        if self.opened_on.is_some() {
            job.opened_on = self.opened_on;
        }
        if self.closed_on.is_some() {
            job.closed_on = self.closed_on;
        }
    }
}

/// Link between a job and a candidate (vínculo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCandidate {
    pub job_id: JobId,
    pub candidate_id: CandidateId,
    pub linked_at: DateTime<Utc>,
    pub note: Option<String>,
    pub stage: PipelineStage,
    pub outcome: HiringOutcome,
    pub decline_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// An assessment document (parecer) in the assessment log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub job_id: Option<JobId>,
    pub candidate_id: Option<CandidateId>,
    pub created_at: DateTime<Utc>,
    pub client_name: String,
    pub job_title: String,
    pub candidate_name: String,
    pub location: String,
    pub age: String,
    pub salary_expectation: String,
    pub linkedin_url: String,
    pub summary: String,
    pub analysis: String,
    pub conclusion: String,
    pub source_format: SourceFormat,
    pub source_path: Option<String>,
    pub stage: PipelineStage,
    pub outcome: HiringOutcome,
    pub decline_reason: Option<String>,
}

impl Assessment {
    pub fn new(candidate_name: impl Into<String>, source_format: SourceFormat) -> Self {
        Self {
            id: 0,
            job_id: None,
            candidate_id: None,
            created_at: Utc::now(),
            client_name: String::new(),
            job_title: String::new(),
            candidate_name: candidate_name.into(),
            location: String::new(),
            age: String::new(),
            salary_expectation: String::new(),
            linkedin_url: String::new(),
            summary: String::new(),
            analysis: String::new(),
            conclusion: String::new(),
            source_format,
            source_path: None,
            stage: PipelineStage::InReview,
            outcome: HiringOutcome::Pending,
            decline_reason: None,
        }
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}

/// Status of an access grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    Active,
    Revoked,
    #[default]
    Pending,
}

impl AccessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStatus::Active => "active",
            AccessStatus::Revoked => "revoked",
            AccessStatus::Pending => "pending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(AccessStatus::Active),
            "revoked" => Some(AccessStatus::Revoked),
            "pending" => Some(AccessStatus::Pending),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Access to a client system granted to a placed candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessGrant {
    pub id: AccessGrantId,
    pub client_id: Option<ClientId>,
    pub client_name: String,
    pub candidate_id: Option<CandidateId>,
    pub candidate_name: String,
    pub system: String,
    pub access_type: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub status: AccessStatus,
    pub notes: Option<String>,
}

impl AccessGrant {
    pub fn new(
        client_name: impl Into<String>,
        candidate_name: impl Into<String>,
        system: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            client_id: None,
            client_name: client_name.into(),
            candidate_id: None,
            candidate_name: candidate_name.into(),
            system: system.into(),
            access_type: None,
            starts_on: Some(today()),
            ends_on: None,
            status: AccessStatus::Pending,
            notes: None,
        }
    }
}

/// Kind of financial document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceKind {
    ServiceOrder,
    Quote,
    Invoice,
}

impl FinanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinanceKind::ServiceOrder => "service_order",
            FinanceKind::Quote => "quote",
            FinanceKind::Invoice => "invoice",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "service_order" | "os" => Some(FinanceKind::ServiceOrder),
            "quote" => Some(FinanceKind::Quote),
            "invoice" => Some(FinanceKind::Invoice),
            _ => None,
        }
    }
}

impl std::fmt::Display for FinanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a financial document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FinanceStatus {
    #[default]
    Open,
    Approved,
    Paid,
    Cancelled,
}

impl FinanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinanceStatus::Open => "open",
            FinanceStatus::Approved => "approved",
            FinanceStatus::Paid => "paid",
            FinanceStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Some(FinanceStatus::Open),
            "approved" => Some(FinanceStatus::Approved),
            "paid" => Some(FinanceStatus::Paid),
            "cancelled" => Some(FinanceStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for FinanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A service order, quote or invoice.
///
/// `amount` is kept exactly as typed (e.g. `3.500,00`); it is never parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub id: FinancialRecordId,
    pub kind: FinanceKind,
    pub client_id: Option<ClientId>,
    pub client_name: String,
    pub description: String,
    pub issued_on: Option<NaiveDate>,
    pub due_on: Option<NaiveDate>,
    pub amount: String,
    pub status: FinanceStatus,
    pub notes: Option<String>,
}

impl FinancialRecord {
    pub fn new(kind: FinanceKind, client_name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            id: 0,
            kind,
            client_id: None,
            client_name: client_name.into(),
            description: String::new(),
            issued_on: Some(today()),
            due_on: None,
            amount: amount.into(),
            status: FinanceStatus::Open,
            notes: None,
        }
    }
}

/// One row of the pipeline report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEntry {
    pub job_id: JobId,
    pub job_title: String,
    pub client_name: Option<String>,
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub stage: PipelineStage,
    pub outcome: HiringOutcome,
    pub decline_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Statistics about the registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryStats {
    pub candidates: i64,
    pub clients: i64,
    pub jobs: i64,
    pub open_jobs: i64,
    pub links: i64,
    pub links_by_stage: std::collections::HashMap<String, i64>,
    pub assessments: i64,
    pub assessments_by_format: std::collections::HashMap<String, i64>,
    pub active_access_grants: i64,
    pub financial_records: i64,
    pub database_size_bytes: i64,
}

fn set_if_some(target: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value {
        target.replace(v.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_parsing() {
        assert_eq!(PipelineStage::from_str("Interview"), Some(PipelineStage::Interview));
        assert_eq!(PipelineStage::from_str(" in_review "), Some(PipelineStage::InReview));
        assert_eq!(PipelineStage::from_str("hired"), None);
        for stage in PipelineStage::ALL {
            assert_eq!(PipelineStage::from_str(stage.as_str()), Some(stage));
        }
    }

    #[test]
    fn test_outcome_accepts_approved_alias() {
        assert_eq!(HiringOutcome::from_str("approved"), Some(HiringOutcome::Hired));
        assert_eq!(HiringOutcome::from_str("WITHDREW"), Some(HiringOutcome::Withdrew));
        assert_eq!(HiringOutcome::default(), HiringOutcome::Pending);
    }

    #[test]
    fn test_candidate_update_touches_only_given_fields() {
        let mut candidate = Candidate::new("Maria Silva").with_city("Curitiba").with_age(31);
        let update = CandidateUpdate {
            phone: Some("41 99999-0000".to_string()),
            age: Some(32),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply(&mut candidate);

        assert_eq!(candidate.name, "Maria Silva");
        assert_eq!(candidate.city.as_deref(), Some("Curitiba"));
        assert_eq!(candidate.phone.as_deref(), Some("41 99999-0000"));
        assert_eq!(candidate.age, Some(32));
    }

    #[test]
    fn test_job_close_stamps_date() {
        let mut job = Job::new("Analista");
        assert_eq!(job.status, JobStatus::Open);
        assert!(job.closed_on.is_none());

        job.set_status(JobStatus::Closed);
        assert!(job.closed_on.is_some());

        job.set_status(JobStatus::Recovered);
        assert!(job.closed_on.is_none());
    }

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(catalog_system("github"), Some("GitHub"));
        assert_eq!(catalog_system("microsoft 365"), Some("Microsoft 365"));
        assert_eq!(catalog_system("Nonexistent"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-11-14"),
            NaiveDate::from_ymd_opt(2025, 11, 14)
        );
        assert_eq!(parse_date("14/11/2025"), None);
    }
}
