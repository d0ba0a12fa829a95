mod agreement;
mod document;
mod modification;

use async_graphql::*;

/// Mutation root combining the agreement, modification request and document
/// mutations
#[derive(Default, MergedObject)]
pub struct Mutation(
    pub agreement::AgreementMutation,
    pub modification::ModificationMutation,
    pub document::DocumentMutation,
);
