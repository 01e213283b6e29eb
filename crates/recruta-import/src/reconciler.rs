//! Identity reconciliation against existing records.
//!
//! Matching is by exact, case-sensitive name. "Maria Silva" and "maria silva"
//! are two different candidates; there is no fuzzy matching.

use once_cell::sync::Lazy;
use recruta_core::{Candidate, CandidateId, Client, ClientId, Job, JobId};
use recruta_db::{Database, DbResult};
use regex::Regex;
use tracing::debug;

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Parse an age from free text such as "31 anos". Absent when no digits are found.
pub fn parse_age(text: &str) -> Option<i64> {
    FIRST_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .filter(|age| *age > 0)
}

/// Resolves names found in documents to record ids, creating what is missing.
pub struct Reconciler<'a> {
    db: &'a Database,
}

impl<'a> Reconciler<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Reuse the candidate with this exact name, or register a new one.
    ///
    /// Location and age only seed a new record; an existing candidate is
    /// never modified.
    pub fn resolve_candidate(
        &self,
        name: &str,
        location: Option<&str>,
        age: Option<&str>,
    ) -> DbResult<CandidateId> {
        let name = name.trim();

        if let Some(existing) = self.db.find_candidate_by_name(name)? {
            debug!("Matched candidate '{}' to {}", name, existing.id);
            return Ok(existing.id);
        }

        let mut candidate = Candidate::new(name);
        candidate.city = location
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        candidate.age = age.and_then(parse_age);

        let id = self.db.create_candidate(&candidate)?;
        debug!("Registered candidate '{}' as {}", name, id);
        Ok(id)
    }

    /// Reuse or create a client. An empty name resolves to nothing.
    pub fn resolve_client(&self, name: &str) -> DbResult<Option<ClientId>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        if let Some(existing) = self.db.find_client_by_name(name)? {
            return Ok(Some(existing.id));
        }

        let id = self.db.create_client(&Client::new(name))?;
        debug!("Registered client '{}' as {}", name, id);
        Ok(Some(id))
    }

    /// Reuse or create a job under the same client reference.
    ///
    /// A job without a client only matches other jobs without a client.
    pub fn resolve_job(&self, client_id: Option<ClientId>, title: &str) -> DbResult<Option<JobId>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        if let Some(existing) = self.db.find_job(client_id, title)? {
            return Ok(Some(existing.id));
        }

        let id = self.db.create_job(&Job::new(title).with_client(client_id))?;
        debug!("Opened job '{}' as {}", title, id);
        Ok(Some(id))
    }
}
