//! Named header templates, one per operation kind.
//!
//! # Design
//! Every request against the store uses one of five fixed header
//! combinations. Each is held here as an immutable template; operations call
//! [`RequestProfile::headers`] to get a fresh clone and add per-request
//! headers (conditional match, body content) to the clone only. Templates are
//! never extended in place — they are shared across every call the client
//! ever makes, and a header leaking from one request into the next is a
//! protocol error the store will not catch for us.

/// Header names used by the profiles and the operations on top of them.
pub const ACCEPT: &str = "ACCEPT";
pub const CONTENT_TYPE: &str = "CONTENT-TYPE";
pub const METHOD_OVERRIDE: &str = "X-HTTP-Method";
pub const IF_MATCH: &str = "IF-MATCH";

const JSON_NO_METADATA: &str = "application/json; odata.metadata=none";
const JSON_FULL_METADATA: &str = "application/json; odata.metadata=full";
const JSON: &str = "application/json";

/// One immutable header template.
#[derive(Debug, Clone)]
pub struct RequestProfile {
    headers: Vec<(String, String)>,
}

impl RequestProfile {
    fn new(headers: &[(&str, &str)]) -> Self {
        Self {
            headers: headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// A fresh copy of the template headers for one request.
    pub fn headers(&self) -> Vec<(String, String)> {
        self.headers.clone()
    }
}

/// The five profiles the access layer uses, built once per client.
#[derive(Debug, Clone)]
pub struct RequestProfileSet {
    /// Plain reads: JSON with no OData metadata.
    pub read_minimal: RequestProfile,
    /// Reads that need the concurrency token and full metadata back.
    pub read_full: RequestProfile,
    /// Record creation.
    pub create: RequestProfile,
    /// Record update, tunneled through POST via MERGE override.
    pub update: RequestProfile,
    /// Record deletion, tunneled through POST via DELETE override.
    pub delete: RequestProfile,
}

impl Default for RequestProfileSet {
    fn default() -> Self {
        Self {
            read_minimal: RequestProfile::new(&[(ACCEPT, JSON_NO_METADATA)]),
            read_full: RequestProfile::new(&[(ACCEPT, JSON_FULL_METADATA)]),
            create: RequestProfile::new(&[(ACCEPT, JSON_NO_METADATA), (CONTENT_TYPE, JSON)]),
            update: RequestProfile::new(&[
                (ACCEPT, JSON_NO_METADATA),
                (CONTENT_TYPE, JSON),
                (METHOD_OVERRIDE, "MERGE"),
            ]),
            delete: RequestProfile::new(&[
                (ACCEPT, JSON_NO_METADATA),
                (CONTENT_TYPE, JSON),
                (METHOD_OVERRIDE, "DELETE"),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn read_profiles_carry_only_accept() {
        let profiles = RequestProfileSet::default();
        let minimal = profiles.read_minimal.headers();
        assert_eq!(minimal.len(), 1);
        assert_eq!(header(&minimal, ACCEPT), Some(JSON_NO_METADATA));

        let full = profiles.read_full.headers();
        assert_eq!(full.len(), 1);
        assert_eq!(header(&full, ACCEPT), Some(JSON_FULL_METADATA));
    }

    #[test]
    fn write_profiles_carry_expected_overrides() {
        let profiles = RequestProfileSet::default();
        assert_eq!(header(&profiles.create.headers(), METHOD_OVERRIDE), None);
        assert_eq!(
            header(&profiles.update.headers(), METHOD_OVERRIDE),
            Some("MERGE")
        );
        assert_eq!(
            header(&profiles.delete.headers(), METHOD_OVERRIDE),
            Some("DELETE")
        );
    }

    #[test]
    fn mutating_a_clone_leaves_the_template_untouched() {
        let profiles = RequestProfileSet::default();
        let mut cloned = profiles.update.headers();
        cloned.push((IF_MATCH.to_string(), "\"42\"".to_string()));

        let fresh = profiles.update.headers();
        assert_eq!(fresh.len(), 3);
        assert_eq!(header(&fresh, IF_MATCH), None);
    }
}
