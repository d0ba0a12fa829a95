use async_graphql::*;

use crate::errors::ResultExt;
use crate::graphql::context::GraphQLContext;
use crate::models::{CreateModificationRequestInput, ModificationRequest};

#[derive(Default)]
pub struct ModificationMutation;

#[Object]
impl ModificationMutation {
    async fn create_modification_request(
        &self,
        ctx: &Context<'_>,
        input: CreateModificationRequestInput,
    ) -> Result<ModificationRequest> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .modification_service
            .create_modification_request(input)
            .await
            .to_graphql_result()
    }

    /// Approve a request and apply its changes to the agreement
    async fn approve_modification_request(
        &self,
        ctx: &Context<'_>,
        id: ID,
        comments: Option<String>,
    ) -> Result<ModificationRequest> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .modification_service
            .approve_modification_request(&id, comments)
            .await
            .to_graphql_result()
    }

    async fn reject_modification_request(
        &self,
        ctx: &Context<'_>,
        id: ID,
        reason: Option<String>,
    ) -> Result<ModificationRequest> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .modification_service
            .reject_modification_request(&id, reason)
            .await
            .to_graphql_result()
    }

    async fn cancel_modification_request(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> Result<ModificationRequest> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .modification_service
            .cancel_modification_request(&id)
            .await
            .to_graphql_result()
    }
}
