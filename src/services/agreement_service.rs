use std::cmp::Ordering;

use chrono::Utc;
use tracing::{debug, info};

use crate::errors::{MockError, MockResult};
use crate::models::{
    Agreement, AgreementFiltersInput, AgreementProduct, AgreementProductInput, AgreementStatus,
    AgreementTerm, AgreementTermInput, CreateAgreementInput, OperationResult, Page,
    PaginationInput, SortOrder, UpdateAgreementInput, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};
use crate::store::{format_id, IdSequences, SharedStore, CURRENT_USER, CURRENT_USER_NAME};

const DEFAULT_CURRENCY: &str = "CAD";
const DEFAULT_BILLING_ACCOUNT: &str = "individual";

pub struct AgreementService {
    store: SharedStore,
}

impl AgreementService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Filter, sort, then paginate the agreements. Reads never modify the store.
    pub async fn list_agreements(
        &self,
        filters: Option<AgreementFiltersInput>,
        pagination: Option<PaginationInput>,
    ) -> MockResult<Page<Agreement>> {
        let store = self.store.read().await;
        let filters = filters.unwrap_or_default();
        let pagination = pagination.unwrap_or_default();

        let mut agreements = filter_agreements(&store.agreements, &filters);
        sort_agreements(&mut agreements, &pagination);

        let page = pagination.page.map_or(DEFAULT_PAGE, |p| p.max(1) as usize);
        let page_size = pagination
            .page_size
            .map_or(DEFAULT_PAGE_SIZE, |s| s.max(1) as usize);

        debug!(
            "agreements: {} of {} match filters",
            agreements.len(),
            store.agreements.len()
        );
        Ok(Page::paginate(agreements, page, page_size))
    }

    pub async fn get_agreement(&self, id: &str) -> MockResult<Agreement> {
        let store = self.store.read().await;
        store
            .find_agreement(id)
            .cloned()
            .ok_or_else(|| MockError::not_found("Agreement", id))
    }

    pub async fn create_agreement(&self, input: CreateAgreementInput) -> MockResult<Agreement> {
        let mut store = self.store.write().await;

        let client = store
            .find_client(&input.client_id)
            .cloned()
            .ok_or_else(|| MockError::not_found("Client", &input.client_id))?;

        let sequence = store.sequences.next_agreement();
        let now = Utc::now();
        let status = match input.status {
            Some(AgreementStatus::Draft) => AgreementStatus::Draft,
            _ => AgreementStatus::PendingApproval,
        };
        let fee_group = format!(
            "FG-{}-{}",
            input
                .program_type
                .as_deref()
                .map(fee_group_prefix)
                .unwrap_or_else(|| "WEALTH".to_string()),
            sequence
        );

        let products = build_products(&mut store.sequences, input.products.unwrap_or_default());
        let terms = build_terms(&mut store.sequences, input.terms.unwrap_or_default());
        let total_amount = products.iter().map(|p| p.total_price).sum();

        let agreement = Agreement {
            id: format_id("AGR", sequence),
            agreement_number: format!("WM-2024-{:03}", sequence),
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            agreement_type: input.agreement_type,
            status,
            start_date: input.start_date,
            end_date: input.end_date,
            total_amount,
            currency: DEFAULT_CURRENCY.to_string(),
            description: input.comments.clone(),
            comments: input.comments,
            created_at: now,
            updated_at: now,
            created_by: CURRENT_USER.to_string(),
            modified_by: None,
            advisor_name: Some(CURRENT_USER_NAME.to_string()),
            products,
            terms,
            documents: Vec::new(),
            selected_accounts: input.selected_accounts.unwrap_or_default(),
            selected_policy_id: input.selected_policy_id,
            selected_household_members: input.selected_household_members.unwrap_or_default(),
            billing_frequency: input.billing_frequency,
            billing_start_date: input.billing_start_date.or(Some(input.start_date)),
            billing_account: Some(
                input
                    .billing_account
                    .unwrap_or_else(|| DEFAULT_BILLING_ACCOUNT.to_string()),
            ),
            program_type: input.program_type,
            fee_type: input.fee_type,
            current_fee_account: input.current_fee_account,
            client_billable_assets: Some(input.client_billable_assets.unwrap_or(0.0)),
            total_household_billable_assets: Some(
                input.total_household_billable_assets.unwrap_or(0.0),
            ),
            program_fee_type: input.program_fee_type,
            fee_schedule: input.fee_schedule,
            integration_period: input.integration_period,
            purpose_of_agreement: input.purpose_of_agreement,
            client_root: client.client_root,
            ia_code: client.ia_code,
            fee_group: Some(fee_group),
        };

        store.agreements.push(agreement.clone());
        info!(
            "Created agreement {} ({}) for client {}",
            agreement.id, agreement.agreement_number, agreement.client_id
        );

        Ok(agreement)
    }

    pub async fn update_agreement(
        &self,
        id: &str,
        input: UpdateAgreementInput,
    ) -> MockResult<Agreement> {
        let mut store = self.store.write().await;
        if store.find_agreement(id).is_none() {
            return Err(MockError::not_found("Agreement", id));
        }

        let products = match input.products {
            Some(products) => Some(build_products(&mut store.sequences, products)),
            None => None,
        };
        let terms = match input.terms {
            Some(terms) => Some(build_terms(&mut store.sequences, terms)),
            None => None,
        };

        let agreement = store
            .find_agreement_mut(id)
            .ok_or_else(|| MockError::not_found("Agreement", id))?;

        macro_rules! overwrite {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = input.$field {
                    agreement.$field = value;
                })*
            };
        }
        macro_rules! overwrite_optional {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = input.$field {
                    agreement.$field = Some(value);
                })*
            };
        }

        overwrite!(
            agreement_type,
            status,
            start_date,
            total_amount,
            currency,
            selected_accounts,
            selected_household_members,
        );
        overwrite_optional!(
            end_date,
            description,
            comments,
            advisor_name,
            selected_policy_id,
            billing_frequency,
            billing_start_date,
            billing_account,
            program_type,
            fee_type,
            current_fee_account,
            client_billable_assets,
            total_household_billable_assets,
            program_fee_type,
            fee_schedule,
            integration_period,
            purpose_of_agreement,
        );
        if let Some(products) = products {
            agreement.products = products;
        }
        if let Some(terms) = terms {
            agreement.terms = terms;
        }

        agreement.updated_at = Utc::now();
        agreement.modified_by = Some(CURRENT_USER.to_string());
        info!("Updated agreement {}", agreement.id);

        Ok(agreement.clone())
    }

    pub async fn delete_agreement(&self, id: &str) -> MockResult<OperationResult> {
        let mut store = self.store.write().await;
        let index = store
            .agreements
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| MockError::not_found("Agreement", id))?;

        store.agreements.remove(index);
        info!("Deleted agreement {}", id);

        Ok(OperationResult::ok("Agreement deleted successfully"))
    }
}

/// Agreements matching every provided filter, in store order.
pub fn filter_agreements(agreements: &[Agreement], filters: &AgreementFiltersInput) -> Vec<Agreement> {
    let client_name = filters.client_name.as_deref().map(str::to_lowercase);
    let search_term = filters.search_term.as_deref().map(str::to_lowercase);

    agreements
        .iter()
        .filter(|a| match &filters.status {
            Some(statuses) if !statuses.is_empty() => statuses.contains(&a.status),
            _ => true,
        })
        .filter(|a| match &filters.agreement_type {
            Some(types) if !types.is_empty() => types.contains(&a.agreement_type),
            _ => true,
        })
        .filter(|a| match &client_name {
            Some(term) if !term.is_empty() => a.client_name.to_lowercase().contains(term),
            _ => true,
        })
        .filter(|a| match &search_term {
            Some(term) if !term.is_empty() => {
                a.agreement_number.to_lowercase().contains(term)
                    || a.client_name.to_lowercase().contains(term)
                    || a
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(term))
            }
            _ => true,
        })
        .filter(|a| filters.date_from.map_or(true, |from| a.start_date >= from))
        .filter(|a| filters.date_to.map_or(true, |to| a.start_date <= to))
        .cloned()
        .collect()
}

/// Sorts by the requested field, or newest-created first when none is given.
/// Records that lack the field, and unknown fields, compare equal.
pub fn sort_agreements(agreements: &mut [Agreement], pagination: &PaginationInput) {
    match pagination.sort_by.as_deref() {
        Some(field) if !field.is_empty() => {
            let descending = pagination.sort_order == Some(SortOrder::Desc);
            agreements.sort_by(|a, b| {
                let ordering = match (a.sort_value(field), b.sort_value(field)) {
                    (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        _ => agreements.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// First six characters of the program type, upper-cased
fn fee_group_prefix(program_type: &str) -> String {
    program_type.chars().take(6).collect::<String>().to_uppercase()
}

fn build_products(
    sequences: &mut IdSequences,
    products: Vec<AgreementProductInput>,
) -> Vec<AgreementProduct> {
    products
        .into_iter()
        .map(|p| AgreementProduct {
            id: format_id("AP", sequences.next_product()),
            total_price: p.unit_price * f64::from(p.quantity),
            product_name: p.product_name,
            product_code: p.product_code,
            quantity: p.quantity,
            unit_price: p.unit_price,
            description: p.description,
        })
        .collect()
}

fn build_terms(sequences: &mut IdSequences, terms: Vec<AgreementTermInput>) -> Vec<AgreementTerm> {
    terms
        .into_iter()
        .map(|t| AgreementTerm {
            id: format_id("AT", sequences.next_term()),
            term_type: t.term_type,
            value: t.value,
            description: t.description,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStore;
    use chrono::NaiveDate;

    fn service() -> AgreementService {
        AgreementService::new(MockStore::seeded().unwrap().into_shared())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_list_defaults_to_newest_first() {
        let page = service().list_agreements(None, None).await.unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.data[0].id, "AGR012");
        assert!(page
            .data
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_status_filter_counts_all_matches() {
        let filters = AgreementFiltersInput {
            status: Some(vec![AgreementStatus::PendingApproval]),
            ..Default::default()
        };
        let page = service()
            .list_agreements(Some(filters), Some(PaginationInput::new(1, 2)))
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data.len(), 2);
        assert!(page
            .data
            .iter()
            .all(|a| a.status == AgreementStatus::PendingApproval));
    }

    #[tokio::test]
    async fn test_text_and_date_filters() {
        let service = service();

        let by_client = AgreementFiltersInput {
            client_name: Some("TREMBLAY".to_string()),
            ..Default::default()
        };
        let page = service.list_agreements(Some(by_client), None).await.unwrap();
        assert_eq!(page.total, 3);

        let by_search = AgreementFiltersInput {
            search_term: Some("wm-2024-00".to_string()),
            ..Default::default()
        };
        let page = service.list_agreements(Some(by_search), None).await.unwrap();
        assert_eq!(page.total, 9);

        let by_dates = AgreementFiltersInput {
            date_from: Some(date(2024, 3, 1)),
            date_to: Some(date(2024, 6, 1)),
            ..Default::default()
        };
        let page = service.list_agreements(Some(by_dates), None).await.unwrap();
        let ids: Vec<_> = page.data.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(page.total, 5);
        assert!(ids.contains(&"AGR003"));
        assert!(ids.contains(&"AGR008"));
    }

    #[tokio::test]
    async fn test_filtering_is_idempotent() {
        let store = MockStore::seeded().unwrap();
        let filters = AgreementFiltersInput {
            status: Some(vec![AgreementStatus::Active, AgreementStatus::Draft]),
            search_term: Some("portfolio".to_string()),
            ..Default::default()
        };

        let once = filter_agreements(&store.agreements, &filters);
        let twice = filter_agreements(&once, &filters);

        assert_eq!(once, twice);
        assert_eq!(store.agreements, MockStore::seeded().unwrap().agreements);
    }

    #[tokio::test]
    async fn test_sort_by_field_and_direction() {
        let pagination = PaginationInput::new(1, 20).sorted_by("totalAmount", SortOrder::Desc);
        let page = service().list_agreements(None, Some(pagination)).await.unwrap();

        assert_eq!(page.data[0].id, "AGR003");
        assert!(page
            .data
            .windows(2)
            .all(|w| w[0].total_amount >= w[1].total_amount));

        let pagination = PaginationInput::new(1, 20).sorted_by("agreementNumber", SortOrder::Asc);
        let page = service().list_agreements(None, Some(pagination)).await.unwrap();
        assert_eq!(page.data[0].agreement_number, "WM-2024-001");
    }

    #[tokio::test]
    async fn test_get_missing_agreement() {
        let err = service().get_agreement("AGR999").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_agreement_stamps_and_numbers() {
        let service = service();
        let mut input = CreateAgreementInput::new("CLI001", "Investment Management", date(2025, 1, 1));
        input.program_type = Some("Managed Portfolio".to_string());
        input.products = Some(vec![AgreementProductInput {
            product_code: "WM-PORT-001".to_string(),
            product_name: "Managed Portfolio Service".to_string(),
            quantity: 2,
            unit_price: 2500.0,
            description: None,
        }]);
        input.comments = Some("New mandate".to_string());

        let first = service.create_agreement(input.clone()).await.unwrap();
        assert_eq!(first.id, "AGR013");
        assert_eq!(first.agreement_number, "WM-2024-013");
        assert_eq!(first.status, AgreementStatus::PendingApproval);
        assert_eq!(first.client_name, "John Smith");
        assert_eq!(first.total_amount, 5000.0);
        assert_eq!(first.products[0].id, "AP100");
        assert_eq!(first.fee_group.as_deref(), Some("FG-MANAGE-13"));
        assert_eq!(first.created_by, CURRENT_USER);
        assert_eq!(first.billing_start_date, Some(date(2025, 1, 1)));
        assert_eq!(first.description.as_deref(), Some("New mandate"));

        input.status = Some(AgreementStatus::Draft);
        input.program_type = None;
        let second = service.create_agreement(input).await.unwrap();
        assert_eq!(second.id, "AGR014");
        assert_eq!(second.status, AgreementStatus::Draft);
        assert_eq!(second.fee_group.as_deref(), Some("FG-WEALTH-14"));

        let page = service.list_agreements(None, None).await.unwrap();
        assert_eq!(page.total, 14);
    }

    #[tokio::test]
    async fn test_create_for_unknown_client_fails() {
        let input = CreateAgreementInput::new("CLI999", "Advisory Services", date(2025, 1, 1));
        let err = service().create_agreement(input).await.unwrap_err();
        assert_eq!(err, MockError::not_found("Client", "CLI999"));
    }

    #[tokio::test]
    async fn test_update_overwrites_given_fields_only() {
        let service = service();
        let before = service.get_agreement("AGR002").await.unwrap();

        let input = UpdateAgreementInput {
            status: Some(AgreementStatus::Active),
            description: Some("Updated scope".to_string()),
            ..Default::default()
        };
        let updated = service.update_agreement("AGR002", input).await.unwrap();

        assert_eq!(updated.status, AgreementStatus::Active);
        assert_eq!(updated.description.as_deref(), Some("Updated scope"));
        assert_eq!(updated.total_amount, before.total_amount);
        assert_eq!(updated.modified_by.as_deref(), Some(CURRENT_USER));
        assert!(updated.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_failed_update_does_not_consume_ids() {
        let service = service();
        let product = AgreementProductInput {
            product_code: "WM-PORT-001".to_string(),
            product_name: "Managed Portfolio Service".to_string(),
            quantity: 1,
            unit_price: 100.0,
            description: None,
        };

        let update = UpdateAgreementInput {
            products: Some(vec![product.clone()]),
            ..Default::default()
        };
        let err = service.update_agreement("AGR999", update).await.unwrap_err();
        assert_eq!(err, MockError::not_found("Agreement", "AGR999"));

        let mut input = CreateAgreementInput::new("CLI001", "Advisory Services", date(2025, 3, 1));
        input.products = Some(vec![product]);
        let created = service.create_agreement(input).await.unwrap();
        assert_eq!(created.id, "AGR013");
        assert_eq!(created.products[0].id, "AP100");
    }

    #[tokio::test]
    async fn test_delete_agreement() {
        let service = service();
        let result = service.delete_agreement("AGR011").await.unwrap();
        assert!(result.success);

        assert!(service.get_agreement("AGR011").await.is_err());
        assert!(service.delete_agreement("AGR011").await.unwrap_err().is_not_found());
    }
}
