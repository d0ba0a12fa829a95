use async_graphql::*;

use crate::errors::ResultExt;
use crate::graphql::context::GraphQLContext;
use crate::models::{
    Account, Agreement, AgreementFiltersInput, AssetAllocationPolicy, Client, DashboardStats,
    HouseholdMember, ModificationRequest, ModificationRequestFiltersInput, Page, PaginationInput,
    Product, ProgramFee,
};

pub struct Query;

#[Object]
impl Query {
    /// Filtered, sorted and paginated agreements
    async fn agreements(
        &self,
        ctx: &Context<'_>,
        filters: Option<AgreementFiltersInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<Page<Agreement>> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .agreement_service
            .list_agreements(filters, pagination)
            .await
            .to_graphql_result()
    }

    async fn agreement(&self, ctx: &Context<'_>, id: ID) -> Result<Agreement> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .agreement_service
            .get_agreement(&id)
            .await
            .to_graphql_result()
    }

    /// Clients matching a name or email fragment
    async fn clients(
        &self,
        ctx: &Context<'_>,
        search_term: Option<String>,
        limit: Option<i32>,
    ) -> Result<Vec<Client>> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .reference_service
            .clients(search_term.as_deref(), limit.map(|l| l.max(0) as usize))
            .await
            .to_graphql_result()
    }

    async fn client(&self, ctx: &Context<'_>, id: ID) -> Result<Client> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .reference_service
            .client(&id)
            .await
            .to_graphql_result()
    }

    async fn client_accounts(&self, ctx: &Context<'_>, client_id: ID) -> Result<Vec<Account>> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .reference_service
            .client_accounts(&client_id)
            .await
            .to_graphql_result()
    }

    async fn household_members(
        &self,
        ctx: &Context<'_>,
        client_id: ID,
    ) -> Result<Vec<HouseholdMember>> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .reference_service
            .household_members(&client_id)
            .await
            .to_graphql_result()
    }

    async fn products(
        &self,
        ctx: &Context<'_>,
        category: Option<String>,
        is_active: Option<bool>,
    ) -> Result<Vec<Product>> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .reference_service
            .products(category.as_deref(), is_active)
            .await
            .to_graphql_result()
    }

    async fn asset_allocation_policies(
        &self,
        ctx: &Context<'_>,
    ) -> Result<Vec<AssetAllocationPolicy>> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .reference_service
            .asset_allocation_policies()
            .await
            .to_graphql_result()
    }

    async fn program_fees(
        &self,
        ctx: &Context<'_>,
        program_type: Option<String>,
    ) -> Result<Vec<ProgramFee>> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .reference_service
            .program_fees(program_type.as_deref())
            .await
            .to_graphql_result()
    }

    async fn modification_requests(
        &self,
        ctx: &Context<'_>,
        filters: Option<ModificationRequestFiltersInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<Page<ModificationRequest>> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .modification_service
            .list_modification_requests(filters, pagination)
            .await
            .to_graphql_result()
    }

    async fn modification_request(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> Result<ModificationRequest> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .modification_service
            .get_modification_request(&id)
            .await
            .to_graphql_result()
    }

    /// Counts and totals over the current agreements
    async fn dashboard_stats(&self, ctx: &Context<'_>) -> Result<DashboardStats> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .dashboard_service
            .dashboard_stats()
            .await
            .to_graphql_result()
    }
}
