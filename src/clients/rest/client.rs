//! The resource-shaped Companies House client.
//!
//! This module provides the [`Client`] type. Each method maps to one
//! Companies House resource; list resources are gathered across all of
//! their pages before returning.

use std::borrow::Cow;

use serde_json::Value;

use crate::clients::connection::{Connection, ConnectionSlot};
use crate::clients::errors::ApiError;
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{Query, Request, ResourceType, TransactionId};
use crate::clients::http_response::PageEnvelope;
use crate::clients::rest::pagination::PageAccumulator;
use crate::config::{ApiKey, ClientConfig, Endpoint};
use crate::error::ConfigError;
use crate::instrumentation::Instrumentation;
use crate::registration_number::RegistrationNumber;

/// Optional parameters of [`Client::company_search`].
///
/// Unset fields are left out of the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompanySearchOptions {
    /// Maximum number of results to return.
    pub items_per_page: Option<u32>,
    /// Offset of the first result.
    pub start_index: Option<u32>,
    /// Search restrictions, e.g. `active-companies`.
    pub restrictions: Option<String>,
}

/// Client for the Companies House REST API.
///
/// Every method returns the decoded JSON body. Paginated methods return the
/// items of every page concatenated in server order.
///
/// # Thread Safety
///
/// `Client` is `Send + Sync`. Concurrent calls share one lazily-opened
/// [`Connection`].
///
/// # Example
///
/// ```rust,no_run
/// use companies_house::{ApiKey, Client, ClientConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::builder()
///     .api_key(ApiKey::new("my-api-key")?)
///     .build()?;
/// let client = Client::new(config);
///
/// let company = client.company("07495895").await?;
/// let officers = client.officers("07495895").await?;
/// println!("{} has {} officers", company["company_name"], officers.len());
///
/// client.end_connection();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    http_client: HttpClient,
    connection: ConnectionSlot,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a client. No connection is opened until the first request.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let http_client = HttpClient::new(&config);
        Self {
            config,
            http_client,
            connection: ConnectionSlot::new(),
        }
    }

    /// Creates a client for the production endpoint with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if `api_key` is empty.
    pub fn from_api_key(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let config = ClientConfig::builder()
            .api_key(ApiKey::new(api_key)?)
            .build()?;
        Ok(Self::new(config))
    }

    /// Returns the configuration of this client.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        self.config.api_key()
    }

    /// Returns the API endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        self.http_client.endpoint()
    }

    /// Returns the instrumentation backend.
    #[must_use]
    pub fn instrumentation(&self) -> &dyn Instrumentation {
        self.config.instrumentation().as_ref()
    }

    /// Returns the connection of this client, opening it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the connection cannot be created.
    pub fn connection(&self) -> Result<Connection, ApiError> {
        self.connection.get_or_open(&self.config)
    }

    /// Closes the connection if one is open.
    ///
    /// Calling this any number of times, including before any request, is
    /// safe. The next request opens a fresh connection.
    pub fn end_connection(&self) {
        self.connection.close();
    }

    /// Retrieves a company profile.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request; a 404 names the company.
    pub async fn company(&self, id: &str) -> Result<Value, ApiError> {
        self.check_company_number(id)?;
        let request = Request::new(
            ResourceType::Company,
            format!("company/{}", segment(id)?),
            TransactionId::generate(),
        )
        .with_resource_id(Some(id.to_string()));
        self.send(request).await
    }

    /// Retrieves every officer of a company.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] raised while gathering pages.
    pub async fn officers(&self, id: &str) -> Result<Vec<Value>, ApiError> {
        self.check_company_number(id)?;
        self.get_all_pages(
            ResourceType::Officers,
            format!("company/{}/officers", segment(id)?),
            id,
            Query::new(),
        )
        .await
    }

    /// Retrieves every person with significant control of a company.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] raised while gathering pages.
    pub async fn persons_with_significant_control(
        &self,
        id: &str,
        register_view: bool,
    ) -> Result<Vec<Value>, ApiError> {
        self.check_company_number(id)?;
        self.get_all_pages(
            ResourceType::PersonsWithSignificantControl,
            format!("company/{}/persons-with-significant-control", segment(id)?),
            id,
            Query::new().param("register_view", register_view),
        )
        .await
    }

    /// Retrieves a corporate entity beneficial owner.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request.
    pub async fn persons_with_significant_control_corporate_entity_beneficial_owner(
        &self,
        id: &str,
        psc_id: &str,
    ) -> Result<Value, ApiError> {
        self.psc_item(
            ResourceType::PersonsWithSignificantControlCorporateEntityBeneficialOwner,
            id,
            "corporate-entity-beneficial-owner",
            psc_id,
        )
        .await
    }

    /// Retrieves a corporate entity with significant control.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request.
    pub async fn persons_with_significant_control_corporate_entity(
        &self,
        id: &str,
        psc_id: &str,
    ) -> Result<Value, ApiError> {
        self.psc_item(
            ResourceType::PersonsWithSignificantControlCorporateEntity,
            id,
            "corporate-entity",
            psc_id,
        )
        .await
    }

    /// Retrieves an individual beneficial owner.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request.
    pub async fn persons_with_significant_control_individual_beneficial_owner(
        &self,
        id: &str,
        psc_id: &str,
    ) -> Result<Value, ApiError> {
        self.psc_item(
            ResourceType::PersonsWithSignificantControlIndividualBeneficialOwner,
            id,
            "individual-beneficial-owner",
            psc_id,
        )
        .await
    }

    /// Retrieves an individual with significant control.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request.
    pub async fn persons_with_significant_control_individual(
        &self,
        id: &str,
        psc_id: &str,
    ) -> Result<Value, ApiError> {
        self.psc_item(
            ResourceType::PersonsWithSignificantControlIndividual,
            id,
            "individual",
            psc_id,
        )
        .await
    }

    /// Retrieves a legal person beneficial owner.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request.
    pub async fn persons_with_significant_control_legal_person_beneficial_owner(
        &self,
        id: &str,
        psc_id: &str,
    ) -> Result<Value, ApiError> {
        self.psc_item(
            ResourceType::PersonsWithSignificantControlLegalPersonBeneficialOwner,
            id,
            "legal-person-beneficial-owner",
            psc_id,
        )
        .await
    }

    /// Retrieves a legal person with significant control.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request.
    pub async fn persons_with_significant_control_legal_person(
        &self,
        id: &str,
        psc_id: &str,
    ) -> Result<Value, ApiError> {
        self.psc_item(
            ResourceType::PersonsWithSignificantControlLegalPerson,
            id,
            "legal-person",
            psc_id,
        )
        .await
    }

    /// Retrieves a super secure beneficial owner.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request.
    pub async fn persons_with_significant_control_super_secure_beneficial_owner(
        &self,
        id: &str,
        super_secure_id: &str,
    ) -> Result<Value, ApiError> {
        self.psc_item(
            ResourceType::PersonsWithSignificantControlSuperSecureBeneficialOwner,
            id,
            "super-secure-beneficial-owner",
            super_secure_id,
        )
        .await
    }

    /// Retrieves a super secure person with significant control.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request.
    pub async fn persons_with_significant_control_super_secure_person(
        &self,
        id: &str,
        super_secure_id: &str,
    ) -> Result<Value, ApiError> {
        self.psc_item(
            ResourceType::PersonsWithSignificantControlSuperSecurePerson,
            id,
            "super-secure",
            super_secure_id,
        )
        .await
    }

    /// Retrieves every PSC statement of a company.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] raised while gathering pages.
    pub async fn persons_with_significant_control_statements(
        &self,
        id: &str,
        register_view: bool,
    ) -> Result<Vec<Value>, ApiError> {
        self.check_company_number(id)?;
        self.get_all_pages(
            ResourceType::PersonsWithSignificantControlStatements,
            format!(
                "company/{}/persons-with-significant-control-statements",
                segment(id)?
            ),
            id,
            Query::new().param("register_view", register_view),
        )
        .await
    }

    /// Retrieves a single PSC statement.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request.
    pub async fn persons_with_significant_control_statement(
        &self,
        id: &str,
        statement_id: &str,
    ) -> Result<Value, ApiError> {
        self.check_company_number(id)?;
        let request = Request::new(
            ResourceType::PersonsWithSignificantControlStatement,
            format!(
                "company/{}/persons-with-significant-control-statements/{}",
                segment(id)?,
                segment(statement_id)?
            ),
            TransactionId::generate(),
        );
        self.send(request).await
    }

    /// Retrieves the full filing history of a company.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] raised while gathering pages.
    pub async fn filing_history_list(&self, id: &str) -> Result<Vec<Value>, ApiError> {
        self.check_company_number(id)?;
        self.get_all_pages(
            ResourceType::FilingHistoryList,
            format!("company/{}/filing-history", segment(id)?),
            id,
            Query::new(),
        )
        .await
    }

    /// Retrieves a single filing history item.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request.
    pub async fn filing_history_item(
        &self,
        id: &str,
        transaction_id: &str,
    ) -> Result<Value, ApiError> {
        self.check_company_number(id)?;
        let request = Request::new(
            ResourceType::FilingHistoryItem,
            format!(
                "company/{}/filing-history/{}",
                segment(id)?,
                segment(transaction_id)?
            ),
            TransactionId::generate(),
        );
        self.send(request).await
    }

    /// Searches companies by name.
    ///
    /// Returns the single page of results the server sends.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the request.
    pub async fn company_search(
        &self,
        query: &str,
        options: CompanySearchOptions,
    ) -> Result<Value, ApiError> {
        let query = Query::new()
            .param("q", query)
            .optional("items_per_page", options.items_per_page)
            .optional("start_index", options.start_index)
            .optional("restrictions", options.restrictions);
        let request = Request::new(
            ResourceType::CompanySearch,
            "search/companies",
            TransactionId::generate(),
        )
        .with_query(query);
        self.send(request).await
    }

    /// Retrieves every charge registered against a company.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] raised while gathering pages.
    pub async fn charges(&self, id: &str) -> Result<Vec<Value>, ApiError> {
        self.check_company_number(id)?;
        self.get_all_pages(
            ResourceType::Charges,
            format!("company/{}/charges", segment(id)?),
            id,
            Query::new(),
        )
        .await
    }

    async fn psc_item(
        &self,
        resource_type: ResourceType,
        id: &str,
        kind: &str,
        psc_id: &str,
    ) -> Result<Value, ApiError> {
        self.check_company_number(id)?;
        let request = Request::new(
            resource_type,
            format!(
                "company/{}/persons-with-significant-control/{kind}/{}",
                segment(id)?,
                segment(psc_id)?
            ),
            TransactionId::generate(),
        );
        self.send(request).await
    }

    async fn send(&self, request: Request) -> Result<Value, ApiError> {
        let connection = self.connection()?;
        self.http_client.execute(&connection, request).await
    }

    /// Requests consecutive pages until the reported total is reached.
    ///
    /// Every page shares one transaction id and carries `start_index` set to
    /// the number of items gathered so far. Any error discards the items
    /// already gathered.
    async fn get_all_pages(
        &self,
        resource_type: ResourceType,
        path: String,
        id: &str,
        query: Query,
    ) -> Result<Vec<Value>, ApiError> {
        let transaction_id = TransactionId::generate();
        let mut accumulator = PageAccumulator::new();

        loop {
            let request = Request::new(resource_type, path.clone(), transaction_id.clone())
                .with_query(query.clone().param("start_index", accumulator.offset()))
                .with_resource_id(Some(id.to_string()));

            let page = PageEnvelope::from_value(self.send(request).await?)?;
            if accumulator.absorb(page)? {
                break;
            }

            tracing::debug!(
                resource = %resource_type,
                transaction_id = %transaction_id,
                offset = accumulator.offset(),
                "Requesting next page"
            );
        }

        Ok(accumulator.into_items())
    }

    fn check_company_number(&self, id: &str) -> Result<(), ApiError> {
        if self.config.validate_company_numbers() && !RegistrationNumber::is_valid(id) {
            return Err(ApiError::InvalidCompanyNumber {
                number: id.to_string(),
            });
        }
        Ok(())
    }
}

/// Percent-encodes one caller-supplied path segment.
///
/// Empty and dot segments are rejected since joining would resolve them
/// onto a different resource.
fn segment(value: &str) -> Result<Cow<'_, str>, ApiError> {
    match value {
        "" | "." | ".." => Err(ApiError::InvalidPath {
            path: value.to_string(),
        }),
        _ => Ok(urlencoding::encode(value)),
    }
}
