use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::mutations::Mutation;
use crate::graphql::queries::Query;
use crate::store::SharedStore;

pub type GraphQLSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn build_schema(store: SharedStore) -> GraphQLSchema {
    Schema::build(Query, Mutation::default(), EmptySubscription)
        .data(GraphQLContext::new(store))
        .finish()
}
