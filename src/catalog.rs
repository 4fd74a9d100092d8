//! The fixed table of Stedi healthcare API requests

use crate::executors::sources::*;
use crate::executors::Executor;
use crate::models::HttpMethod;

#[derive(Debug)]
pub struct CatalogEntry {
    pub id: u32,
    pub method: HttpMethod,
    pub path: &'static str,
    pub description: Option<&'static str>,
    pub executor: &'static Executor,
}

impl CatalogEntry {
    /// `"{id}. {METHOD} {path}"`
    pub fn label(&self) -> String {
        format!("{}. {} {}", self.id, self.method, self.path)
    }

    pub fn full_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path)
    }
}

macro_rules! entry {
    ($id:expr, $method:ident, $path:expr, $description:expr, $executor:expr) => {
        CatalogEntry {
            id: $id,
            method: HttpMethod::$method,
            path: $path,
            description: Some($description),
            executor: &$executor,
        }
    };
}

static ENTRIES: [CatalogEntry; 21] = [
    entry!(1, POST, "/change/medicalnetwork/claimstatus/v2",
        "Submit a 276/277 real-time claim status check in JSON format", CLAIM_STATUS),
    entry!(2, POST, "/change/medicalnetwork/claimstatus/v2/raw-x12",
        "Submit a 276/277 real-time claim status check in raw X12 EDI format", CLAIM_STATUS_RAW_X12),
    entry!(3, POST, "/change/medicalnetwork/eligibility/v3",
        "Submit a real-time 270/271 eligibility check in JSON format", ELIGIBILITY),
    entry!(4, POST, "/change/medicalnetwork/eligibility/v3/raw-x12",
        "Submit a real-time 270/271 eligibility check in raw X12 EDI format", ELIGIBILITY_RAW_X12),
    entry!(5, POST, "/change/medicalnetwork/institutionalclaims/v1/raw-x12-submission",
        "Submit an 837I institutional claim in raw X12 EDI format", INSTITUTIONAL_CLAIM_RAW_X12),
    entry!(6, POST, "/change/medicalnetwork/institutionalclaims/v1/submission",
        "Submit an 837I institutional claim in JSON format", INSTITUTIONAL_CLAIM),
    entry!(7, POST, "/change/medicalnetwork/professionalclaims/v3/raw-x12-submission",
        "Submit an 837P professional claim in raw X12 EDI format", PROFESSIONAL_CLAIM_RAW_X12),
    entry!(8, POST, "/change/medicalnetwork/professionalclaims/v3/submission",
        "Submit an 837P professional claim in JSON format", PROFESSIONAL_CLAIM),
    entry!(9, GET, "/change/medicalnetwork/reports/v2/{eligibilitySearchId}/277",
        "Get 277 claim status report", CLAIM_STATUS_REPORT),
    entry!(10, GET, "/change/medicalnetwork/reports/v2/{eligibilitySearchId}/835",
        "Get 835 payment report", PAYMENT_REPORT),
    entry!(11, POST, "/coordination-of-benefits",
        "Submit coordination of benefits check", COORDINATION_OF_BENEFITS),
    entry!(12, POST, "/dental-claims/raw-x12-submission",
        "Submit dental claim in raw X12 EDI format", DENTAL_CLAIM_RAW_X12),
    entry!(13, POST, "/dental-claims/submission",
        "Submit dental claim in JSON format", DENTAL_CLAIM),
    entry!(14, GET, "/export/pdf", "Export PDF", EXPORT_PDF),
    entry!(15, GET, "/export/{claimId}/1500/pdf", "Export 1500 form PDF", EXPORT_1500_PDF),
    entry!(16, POST, "/insurance-discovery/check/v1",
        "Submit insurance discovery check", INSURANCE_DISCOVERY),
    entry!(17, GET, "/insurance-discovery/check/v1/{checkId}",
        "Get insurance discovery check result", INSURANCE_DISCOVERY_RESULT),
    entry!(18, GET, "/payer/{payerId}", "Get payer information", PAYER),
    entry!(19, GET, "/payers", "List all payers", PAYERS),
    entry!(20, GET, "/payers/csv", "Export payers as CSV", PAYERS_CSV),
    entry!(21, GET, "/payers/search", "Search payers", PAYERS_SEARCH),
];

/// Ordered view over the request table
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    entries: &'static [CatalogEntry],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Catalog { entries: &ENTRIES }
    }

    /// Catalog over a caller-supplied table, kept in the given order
    pub fn from_entries(entries: &'static [CatalogEntry]) -> Self {
        Catalog { entries }
    }

    pub fn get(&self, id: u32) -> Option<&'static CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &'static CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<&'static CatalogEntry> {
        self.entries.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_ascending_and_unique() {
        let catalog = Catalog::new();
        assert_eq!(catalog.len(), 21);
        let ids: Vec<u32> = catalog.iter().map(|e| e.id).collect();
        assert_eq!(ids, (1..=21).collect::<Vec<_>>());
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::new();
        let entry = catalog.get(2).unwrap();
        assert_eq!(entry.method, HttpMethod::POST);
        assert_eq!(entry.path, "/change/medicalnetwork/claimstatus/v2/raw-x12");
        assert_eq!(entry.executor.name, "claim_status_raw_x12");
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(22).is_none());
        assert_eq!(catalog.at(20).map(|e| e.id), Some(21));
    }

    #[test]
    fn test_label_and_url() {
        let entry = Catalog::new().get(19).unwrap();
        assert_eq!(entry.label(), "19. GET /payers");
        assert_eq!(
            entry.full_url("https://example.com"),
            "https://example.com/payers"
        );
    }

    #[test]
    fn test_executor_names_are_unique() {
        let mut names: Vec<&str> = Catalog::new().iter().map(|e| e.executor.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 21);
    }
}
