//! Request value types for the Companies House client.
//!
//! A [`Request`] describes one physical HTTP call. It is built fresh for
//! every call and never reused; pages of one logical call share only their
//! [`TransactionId`].

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Serialize, Serializer};

/// Prefix of every instrumentation event name.
pub const EVENT_NAMESPACE: &str = "companies_house";

/// HTTP methods used by the client.
///
/// The API is read-only for this client, so only `GET` exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    #[default]
    Get,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
        }
    }
}

impl Serialize for HttpMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The logical operation a request belongs to.
///
/// Used to name instrumentation events and in not-found messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// A company profile.
    Company,
    /// The officers of a company.
    Officers,
    /// The persons with significant control of a company.
    PersonsWithSignificantControl,
    /// A corporate entity beneficial owner.
    PersonsWithSignificantControlCorporateEntityBeneficialOwner,
    /// A corporate entity with significant control.
    PersonsWithSignificantControlCorporateEntity,
    /// An individual beneficial owner.
    PersonsWithSignificantControlIndividualBeneficialOwner,
    /// An individual with significant control.
    PersonsWithSignificantControlIndividual,
    /// A legal person beneficial owner.
    PersonsWithSignificantControlLegalPersonBeneficialOwner,
    /// A legal person with significant control.
    PersonsWithSignificantControlLegalPerson,
    /// A super secure beneficial owner.
    PersonsWithSignificantControlSuperSecureBeneficialOwner,
    /// A super secure person with significant control.
    PersonsWithSignificantControlSuperSecurePerson,
    /// The PSC statements of a company.
    PersonsWithSignificantControlStatements,
    /// A single PSC statement.
    PersonsWithSignificantControlStatement,
    /// The filing history of a company.
    FilingHistoryList,
    /// A single filing history item.
    FilingHistoryItem,
    /// A company name search.
    CompanySearch,
    /// The charges registered against a company.
    Charges,
}

impl ResourceType {
    /// Returns the symbolic tag of this resource type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Officers => "officers",
            Self::PersonsWithSignificantControl => "persons_with_significant_control",
            Self::PersonsWithSignificantControlCorporateEntityBeneficialOwner => {
                "persons_with_significant_control_corporate_entity_beneficial_owner"
            }
            Self::PersonsWithSignificantControlCorporateEntity => {
                "persons_with_significant_control_corporate_entity"
            }
            Self::PersonsWithSignificantControlIndividualBeneficialOwner => {
                "persons_with_significant_control_individual_beneficial_owner"
            }
            Self::PersonsWithSignificantControlIndividual => {
                "persons_with_significant_control_individual"
            }
            Self::PersonsWithSignificantControlLegalPersonBeneficialOwner => {
                "persons_with_significant_control_legal_person_beneficial_owner"
            }
            Self::PersonsWithSignificantControlLegalPerson => {
                "persons_with_significant_control_legal_person"
            }
            Self::PersonsWithSignificantControlSuperSecureBeneficialOwner => {
                "persons_with_significant_control_super_secure_beneficial_owner"
            }
            Self::PersonsWithSignificantControlSuperSecurePerson => {
                "persons_with_significant_control_super_secure_person"
            }
            Self::PersonsWithSignificantControlStatements => {
                "persons_with_significant_control_statements"
            }
            Self::PersonsWithSignificantControlStatement => {
                "persons_with_significant_control_statement"
            }
            Self::FilingHistoryList => "filing_history_list",
            Self::FilingHistoryItem => "filing_history_item",
            Self::CompanySearch => "company_search",
            Self::Charges => "charges",
        }
    }

    /// Returns the instrumentation event name, e.g. `companies_house.officers`.
    #[must_use]
    pub fn event_name(&self) -> String {
        format!("{EVENT_NAMESPACE}.{}", self.as_str())
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResourceType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Correlation token shared by every physical request of one logical call.
///
/// # Example
///
/// ```rust
/// use companies_house::clients::TransactionId;
///
/// let id = TransactionId::generate();
/// assert_eq!(id.as_ref().len(), 20);
/// assert!(id.as_ref().chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Number of random bytes in a generated id.
    const BYTES: usize = 10;

    /// Generates a fresh random id (20 lowercase hex characters).
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; Self::BYTES] = rand::thread_rng().gen();
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Query parameters of a request.
///
/// Absent values are never stored, so they are omitted from the encoded
/// query string. Keys are kept sorted.
///
/// # Example
///
/// ```rust
/// use companies_house::clients::Query;
///
/// let query = Query::new()
///     .param("q", "020")
///     .optional("items_per_page", Some(5))
///     .optional::<u32>("start_index", None);
///
/// assert_eq!(query.get("items_per_page"), Some("5"));
/// assert!(query.get("start_index").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query(BTreeMap<String, String>);

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    /// Sets a parameter only when a value is present.
    #[must_use]
    pub fn optional<T: ToString>(self, key: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns `true` if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// One physical HTTP call.
///
/// The path, resource type and transaction id are mandatory; the query and
/// resource id are optional.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (always GET).
    pub method: HttpMethod,
    /// Path relative to the endpoint.
    pub path: String,
    /// Query parameters.
    pub query: Query,
    /// The logical operation this request belongs to.
    pub resource_type: ResourceType,
    /// Identifier reported in not-found messages.
    pub resource_id: Option<String>,
    /// Correlation id shared with the other requests of the same logical call.
    pub transaction_id: TransactionId,
}

impl Request {
    /// Creates a GET request with no query and no resource id.
    #[must_use]
    pub fn new(
        resource_type: ResourceType,
        path: impl Into<String>,
        transaction_id: TransactionId,
    ) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Query::new(),
            resource_type,
            resource_id: None,
            transaction_id,
        }
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Sets the identifier reported in not-found messages.
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: Option<String>) -> Self {
        self.resource_id = resource_id;
        self
    }
}
