use async_graphql::*;

use crate::errors::ResultExt;
use crate::graphql::context::GraphQLContext;
use crate::models::{Agreement, CreateAgreementInput, OperationResult, UpdateAgreementInput};

#[derive(Default)]
pub struct AgreementMutation;

#[Object]
impl AgreementMutation {
    /// Create an agreement for an existing client
    async fn create_agreement(
        &self,
        ctx: &Context<'_>,
        input: CreateAgreementInput,
    ) -> Result<Agreement> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .agreement_service
            .create_agreement(input)
            .await
            .to_graphql_result()
    }

    /// Overwrite the provided fields of an agreement
    async fn update_agreement(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateAgreementInput,
    ) -> Result<Agreement> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .agreement_service
            .update_agreement(&id, input)
            .await
            .to_graphql_result()
    }

    async fn delete_agreement(&self, ctx: &Context<'_>, id: ID) -> Result<OperationResult> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .agreement_service
            .delete_agreement(&id)
            .await
            .to_graphql_result()
    }
}
